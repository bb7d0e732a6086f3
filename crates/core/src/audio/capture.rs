//! Live capture wiring between the system input device and the tap.

use std::fmt;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamError, SupportedStreamConfig};

use super::{decode, AudioTap};
use crate::{Result, WavescopeError};

/// Owns the platform capture stream feeding an [`AudioTap`].
///
/// The session resolves the default input device once, sizes a tap for the
/// device channel count, and decodes whatever byte format each delivery
/// claims to carry. Runtime stream errors never panic the callback thread:
/// the session records the message, flips its stopped flag and leaves the
/// restart policy to the host.
pub struct CaptureSession {
    device: Device,
    config: SupportedStreamConfig,
    tap: Arc<AudioTap>,
    stream: Option<Stream>,
    stopped: Arc<AtomicBool>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl CaptureSession {
    /// Opens the default input device and sizes a tap for at least
    /// `min_frames` frames of history per channel.
    pub fn open(min_frames: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(WavescopeError::NoInputDevice)?;
        let config = device.default_input_config()?;
        let tap = Arc::new(AudioTap::new(min_frames, config.channels() as usize));

        tracing::info!(
            device = %device.name().unwrap_or_else(|_| String::from("<unnamed>")),
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            format = ?config.sample_format(),
            "opened capture device"
        );

        Ok(Self {
            device,
            config,
            tap,
            stream: None,
            stopped: Arc::new(AtomicBool::new(false)),
            last_error: Arc::new(Mutex::new(None)),
        })
    }

    /// Shared tap receiving the decoded capture stream.
    pub fn tap(&self) -> Arc<AudioTap> {
        self.tap.clone()
    }

    /// Sample rate of the capture stream in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    /// Number of channels the device delivers.
    pub fn channels(&self) -> u16 {
        self.config.channels()
    }

    /// Builds and starts the capture stream. Calling `start` on a running
    /// session is a no-op.
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let tap = self.tap.clone();
        let mut scratch: Vec<f32> = Vec::new();
        let stopped = self.stopped.clone();
        let last_error = self.last_error.clone();

        let stream = self.device.build_input_stream_raw(
            &self.config.config(),
            self.config.sample_format(),
            move |data, _| {
                decode::decode_into(data.bytes(), data.sample_format(), &mut scratch);
                if scratch.is_empty() {
                    return;
                }
                if let Err(err) = tap.write(&scratch) {
                    tracing::warn!(%err, "dropped capture block");
                }
            },
            move |err: StreamError| {
                tracing::error!(%err, "capture stream error");
                if let Ok(mut slot) = last_error.lock() {
                    *slot = Some(err.to_string());
                }
                stopped.store(true, Ordering::SeqCst);
            },
            None,
        )?;
        stream.play()?;

        self.stopped.store(false, Ordering::SeqCst);
        self.stream = Some(stream);
        tracing::info!("capture started");
        Ok(())
    }

    /// True once the stream reported a fatal error.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Message recorded by the most recent stream error, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|slot| slot.clone())
    }

    /// Stops capture and tears down the stream. A later `start` builds a
    /// fresh one.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::info!("capture stopped");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("sample_rate", &self.sample_rate())
            .field("channels", &self.channels())
            .field("running", &self.stream.is_some())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
