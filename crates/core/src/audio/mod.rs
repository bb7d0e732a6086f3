//! Shared audio state between the capture callback and the render pipeline.

use std::sync::{Mutex, MutexGuard};

use crate::{Result, WavescopeError};

pub mod capture;
pub mod decode;

pub use capture::CaptureSession;

/// Minimum history the tap retains, in frames per channel.
const MIN_FRAMES: usize = 1024;

/// Circular sample store bridging the two timing domains of the pipeline.
///
/// The capture callback appends interleaved samples whenever the device
/// delivers them; the scheduler asks for a mono snapshot of the most recent
/// history on every tick. Both sides share one coarse mutex whose critical
/// sections only copy samples, so neither side can stall the other for more
/// than a buffer copy.
#[derive(Debug)]
pub struct AudioTap {
    channels: usize,
    state: Mutex<TapState>,
}

#[derive(Debug)]
struct TapState {
    buffer: Vec<f32>,
    cursor: usize,
    written: u64,
}

impl AudioTap {
    /// Creates a tap retaining `frames` frames of `channels`-channel audio.
    ///
    /// Degenerate requests are clamped: at least one channel and at least
    /// [`MIN_FRAMES`] frames are always allocated. The capacity is fixed for
    /// the lifetime of the tap.
    pub fn new(frames: usize, channels: usize) -> Self {
        let channels = channels.max(1);
        let frames = frames.max(MIN_FRAMES);
        tracing::debug!(frames, channels, "allocating audio tap");
        Self {
            channels,
            state: Mutex::new(TapState {
                buffer: vec![0.0; frames * channels],
                cursor: 0,
                written: 0,
            }),
        }
    }

    /// Number of interleaved channels the tap stores.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Capacity in frames.
    pub fn capacity_frames(&self) -> Result<usize> {
        let state = self.lock()?;
        Ok(state.buffer.len() / self.channels)
    }

    /// Appends interleaved samples, silently overwriting the oldest history
    /// once the buffer wraps. Intended for the capture callback: the only
    /// work under the lock is the copy itself.
    pub fn write(&self, samples: &[f32]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        let mut state = self.lock()?;
        let len = state.buffer.len();
        let mut cursor = state.cursor;
        for &sample in samples {
            state.buffer[cursor] = sample;
            cursor += 1;
            if cursor >= len {
                cursor = 0;
            }
        }
        state.cursor = cursor;
        state.written += samples.len() as u64;
        Ok(())
    }

    /// Copies the most recent `dest.len()` frames into `dest`, averaging the
    /// channels of each frame down to mono.
    ///
    /// Returns the number of frames produced: zero until the first `write`
    /// delivers samples, afterwards the full request bounded by the tap
    /// capacity. History that predates the first wrap reads as silence.
    pub fn snapshot(&self, dest: &mut [f32]) -> Result<usize> {
        let state = self.lock()?;
        if state.written == 0 || dest.is_empty() {
            return Ok(0);
        }

        let len = state.buffer.len();
        let frames = dest.len().min(len / self.channels);
        let needed = frames * self.channels;
        let start = (state.cursor + len - needed) % len;

        for (f, slot) in dest.iter_mut().take(frames).enumerate() {
            let base = start + f * self.channels;
            let mut sum = 0.0;
            for c in 0..self.channels {
                sum += state.buffer[(base + c) % len];
            }
            *slot = sum / self.channels as f32;
        }
        Ok(frames)
    }

    fn lock(&self) -> Result<MutexGuard<'_, TapState>> {
        self.state
            .lock()
            .map_err(|_| WavescopeError::msg("audio tap state has been poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn snapshot_is_empty_until_first_write() {
        let tap = AudioTap::new(2048, 1);
        let mut dest = vec![7.0; 256];
        assert_eq!(tap.snapshot(&mut dest).unwrap(), 0);

        tap.write(&[0.25; 512]).unwrap();
        assert_eq!(tap.snapshot(&mut dest).unwrap(), 256);
        assert!(dest.iter().all(|&s| s == 0.25));
    }

    #[test]
    fn writing_an_empty_block_does_not_count_as_signal() {
        let tap = AudioTap::new(1024, 1);
        tap.write(&[]).unwrap();
        let mut dest = [0.0; 16];
        assert_eq!(tap.snapshot(&mut dest).unwrap(), 0);
    }

    #[test]
    fn snapshot_mixes_interleaved_channels_to_mono() {
        let tap = AudioTap::new(1024, 2);
        let mut block = Vec::new();
        for _ in 0..128 {
            block.push(0.5);
            block.push(1.0);
        }
        tap.write(&block).unwrap();

        let mut dest = [0.0; 64];
        assert_eq!(tap.snapshot(&mut dest).unwrap(), 64);
        assert!(dest.iter().all(|&s| (s - 0.75).abs() < 1e-6));
    }

    #[test]
    fn snapshot_returns_the_most_recent_history_across_a_wrap() {
        let tap = AudioTap::new(1024, 1);
        tap.write(&vec![0.1; 1024]).unwrap();
        tap.write(&[0.9; 4]).unwrap();

        let mut dest = [0.0; 8];
        assert_eq!(tap.snapshot(&mut dest).unwrap(), 8);
        assert!(dest[..4].iter().all(|&s| (s - 0.1).abs() < 1e-6));
        assert!(dest[4..].iter().all(|&s| (s - 0.9).abs() < 1e-6));
    }

    #[test]
    fn degenerate_construction_is_clamped() {
        let tap = AudioTap::new(0, 0);
        assert_eq!(tap.channels(), 1);
        assert_eq!(tap.capacity_frames().unwrap(), 1024);
    }

    #[test]
    fn oversized_requests_are_bounded_by_capacity() {
        let tap = AudioTap::new(1024, 1);
        tap.write(&[0.5; 32]).unwrap();
        let mut dest = vec![0.0; 4096];
        assert_eq!(tap.snapshot(&mut dest).unwrap(), 1024);
    }

    #[test]
    fn concurrent_writer_and_reader_make_progress() {
        let tap = Arc::new(AudioTap::new(4096, 2));
        let writer = {
            let tap = tap.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    tap.write(&[0.5; 256]).unwrap();
                }
            })
        };

        let mut dest = vec![0.0; 1024];
        for _ in 0..50 {
            let frames = tap.snapshot(&mut dest).unwrap();
            assert!(dest[..frames].iter().all(|s| s.abs() <= 1.0));
        }
        writer.join().expect("writer thread panicked");

        let frames = tap.snapshot(&mut dest).unwrap();
        assert_eq!(frames, 1024);
        assert!(dest.iter().all(|&s| (s - 0.5).abs() < 1e-6));
    }
}
