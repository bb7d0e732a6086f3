//! Windowed FFT front end for the visualization pipeline.

use std::{f32::consts::PI, fmt, sync::Arc};

use rustfft::{Fft, FftPlanner};

pub use rustfft::num_complex::Complex32;

use crate::{Result, WavescopeError};

/// Transform length used by the live pipeline.
pub const DEFAULT_FFT_SIZE: usize = 1024;

/// Fixed-size forward FFT with a Hamming window.
///
/// The analyzer owns every buffer it needs, so a tick never allocates:
/// callers hand in a mono sample slice and borrow the complex spectrum back
/// until the next call.
pub struct SpectrumAnalyzer {
    size: usize,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl SpectrumAnalyzer {
    /// Creates an analyzer for transforms of `size` points.
    ///
    /// The radix-2 pipeline requires `size` to be a power of two; anything
    /// else is rejected here rather than producing a silently degraded
    /// spectrum later.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || !size.is_power_of_two() {
            return Err(WavescopeError::InvalidFftSize(size));
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex32::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Ok(Self {
            size,
            window: (0..size).map(|i| hamming_value(i, size)).collect(),
            fft,
            buffer: vec![Complex32::new(0.0, 0.0); size],
            scratch,
        })
    }

    /// Transform length in samples.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs the windowed forward transform over `samples`.
    ///
    /// Only the first `valid` entries count as signal; the remainder of the
    /// frame is zero padded, which keeps magnitudes stable while the capture
    /// buffer warms up. The output is normalized by `1/N`, the convention
    /// every renderer gain constant assumes. The returned slice borrows the
    /// analyzer's internal buffer and is overwritten by the next call.
    pub fn analyze(&mut self, samples: &[f32], valid: usize) -> &[Complex32] {
        let valid = valid.min(samples.len()).min(self.size);
        for i in 0..self.size {
            let re = if i < valid {
                samples[i] * self.window[i]
            } else {
                0.0
            };
            self.buffer[i] = Complex32::new(re, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = self.size as f32;
        for bin in &mut self.buffer {
            *bin = bin.unscale(scale);
        }
        &self.buffer
    }
}

impl fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("size", &self.size)
            .finish()
    }
}

/// Hamming window coefficient for `index` of a `len`-point window.
fn hamming_value(index: usize, len: usize) -> f32 {
    if len <= 1 {
        return 1.0;
    }

    0.54 - 0.46 * ((2.0 * PI * index as f32) / (len as f32 - 1.0)).cos()
}

/// Root mean square of a sample block, used for trace logging.
pub(crate) fn compute_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|sample| sample * sample).sum();
    (sum / samples.len() as f32).sqrt()
}
