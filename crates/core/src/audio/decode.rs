//! Raw capture bytes to normalized `f32` samples.

use cpal::SampleFormat;

/// Decodes an interleaved byte stream into `f32` samples in `[-1.0, 1.0]`.
///
/// Only 32-bit float and 16-bit signed integer deliveries are understood;
/// any other format yields an empty result so the capture callback can drop
/// the block without erroring. Trailing bytes that do not form a whole
/// sample are discarded.
pub fn decode(bytes: &[u8], format: SampleFormat) -> Vec<f32> {
    let mut samples = Vec::new();
    decode_into(bytes, format, &mut samples);
    samples
}

/// Allocation-free variant of [`decode`]: clears `dest` and refills it.
///
/// The capture callback reuses one scratch vector across deliveries, so the
/// steady state never allocates.
pub fn decode_into(bytes: &[u8], format: SampleFormat, dest: &mut Vec<f32>) {
    dest.clear();
    match format {
        SampleFormat::F32 => {
            dest.reserve(bytes.len() / 4);
            for chunk in bytes.chunks_exact(4) {
                let raw = [chunk[0], chunk[1], chunk[2], chunk[3]];
                dest.push(f32::from_ne_bytes(raw));
            }
        }
        SampleFormat::I16 => {
            dest.reserve(bytes.len() / 2);
            for chunk in bytes.chunks_exact(2) {
                let raw = [chunk[0], chunk[1]];
                dest.push(i16::from_ne_bytes(raw) as f32 / 32768.0);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    fn i16_bytes(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    #[test]
    fn decodes_float_samples_verbatim() {
        let bytes = f32_bytes(&[0.0, 0.5, -1.0, 0.25]);
        let samples = decode(&bytes, SampleFormat::F32);
        assert_eq!(samples, vec![0.0, 0.5, -1.0, 0.25]);
    }

    #[test]
    fn normalizes_pcm16_by_full_scale() {
        let bytes = i16_bytes(&[0, 16384, -32768, 32767]);
        let samples = decode(&bytes, SampleFormat::I16);
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 0.5).abs() < 1e-6);
        assert!((samples[2] + 1.0).abs() < 1e-6);
        assert!(samples[3] < 1.0 && samples[3] > 0.999);
    }

    #[test]
    fn discards_trailing_partial_sample() {
        let mut bytes = f32_bytes(&[1.0]);
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        let samples = decode(&bytes, SampleFormat::F32);
        assert_eq!(samples.len(), 1);

        let mut bytes = i16_bytes(&[100, 200]);
        bytes.push(0x7F);
        let samples = decode(&bytes, SampleFormat::I16);
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn unsupported_formats_yield_nothing() {
        let bytes = f32_bytes(&[0.5; 8]);
        assert!(decode(&bytes, SampleFormat::F64).is_empty());
        assert!(decode(&bytes, SampleFormat::I32).is_empty());
        assert!(decode(&bytes, SampleFormat::U8).is_empty());
    }

    #[test]
    fn reused_scratch_is_cleared_between_calls() {
        let mut scratch = vec![9.0; 16];
        decode_into(&f32_bytes(&[0.125]), SampleFormat::F32, &mut scratch);
        assert_eq!(scratch, vec![0.125]);
        decode_into(&[], SampleFormat::F32, &mut scratch);
        assert!(scratch.is_empty());
    }
}
