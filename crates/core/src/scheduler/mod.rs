//! Fixed-interval scheduling of the capture, analyze, render pipeline.
//!
//! The host drives [`RenderScheduler::tick`] from its own timing source
//! (the bundled CLI host every 16 ms). A tick snapshots the most recent
//! samples, runs the FFT, renders a frame and publishes it; ticks that
//! arrive while a frame is still in flight are dropped rather than queued,
//! and a failed tick keeps the previous published frame on screen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tiny_skia::{Color, Pixmap};

use crate::analysis::{self, SpectrumAnalyzer};
use crate::audio::AudioTap;
use crate::config::FeatureFlags;
use crate::error::{Result, WavescopeError};
use crate::render::{RenderEngine, VisualizationKind};

/// Translucent black wash painted under every frame. Hosts that keep the
/// previous frame on screen get a motion trail from the low alpha.
fn backdrop() -> Color {
    Color::from_rgba8(0, 0, 0, 30)
}

/// What a call to [`RenderScheduler::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A spectrum frame was rendered and published.
    Rendered,
    /// No samples have arrived yet; the placeholder frame was published.
    NoSignal,
    /// A previous tick was still running, so this one was dropped.
    Skipped,
    /// The pipeline failed; the previously published frame is kept.
    Failed,
}

/// A finished frame handed to the host.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The rendered canvas.
    pub pixmap: Pixmap,
    /// True when the frame is the waiting-for-audio placeholder.
    pub no_signal: bool,
}

/// The analyzer, engine and sample scratch behind the pipeline mutex.
struct Pipeline {
    analyzer: SpectrumAnalyzer,
    engine: RenderEngine,
    samples: Vec<f32>,
}

/// Drives the visualization pipeline at the pace set by the host.
///
/// All methods take `&self`; the scheduler is meant to be shared behind an
/// [`Arc`] between the host's tick loop and whatever controls strategy
/// selection.
pub struct RenderScheduler {
    tap: Arc<AudioTap>,
    pipeline: Mutex<Pipeline>,
    busy: AtomicBool,
    published: Mutex<Option<Arc<Frame>>>,
}

impl RenderScheduler {
    /// Builds a scheduler reading from `tap` with a transform of
    /// `fft_size` samples. Fails when the size is not a power of two.
    pub fn new(tap: Arc<AudioTap>, fft_size: usize, flags: FeatureFlags) -> Result<Self> {
        let analyzer = SpectrumAnalyzer::new(fft_size)?;
        Ok(Self {
            tap,
            pipeline: Mutex::new(Pipeline {
                analyzer,
                engine: RenderEngine::new(flags),
                samples: vec![0.0; fft_size],
            }),
            busy: AtomicBool::new(false),
            published: Mutex::new(None),
        })
    }

    /// Runs one pipeline pass and publishes the resulting frame.
    ///
    /// At most one pass runs at a time. A tick that arrives while another
    /// is in flight returns [`TickOutcome::Skipped`] without blocking, and
    /// any failure is logged and absorbed so the host's timing loop never
    /// sees an error.
    pub fn tick(&self, width: u32, height: u32) -> TickOutcome {
        if self.busy.swap(true, Ordering::Acquire) {
            tracing::debug!("tick overlapped a frame still in flight, skipping");
            return TickOutcome::Skipped;
        }

        let outcome = match self.run(width, height) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(%err, "tick failed, keeping the previous frame");
                TickOutcome::Failed
            }
        };

        self.busy.store(false, Ordering::Release);
        outcome
    }

    fn run(&self, width: u32, height: u32) -> Result<TickOutcome> {
        let mut pipeline = self.lock_pipeline()?;
        let pipeline = &mut *pipeline;

        let frames = self.tap.snapshot(&mut pipeline.samples)?;

        let mut canvas = Pixmap::new(width, height).ok_or_else(|| {
            WavescopeError::msg(format!("cannot allocate a {width}x{height} canvas"))
        })?;
        canvas.fill(backdrop());

        if frames == 0 {
            pipeline.engine.render_placeholder(&mut canvas);
            self.publish(Frame {
                pixmap: canvas,
                no_signal: true,
            })?;
            return Ok(TickOutcome::NoSignal);
        }

        let rms = analysis::compute_rms(&pipeline.samples[..frames]);
        tracing::trace!(frames, rms, "rendering spectrum frame");

        let spectrum = pipeline.analyzer.analyze(&pipeline.samples, frames);
        pipeline.engine.render(spectrum, &mut canvas);

        self.publish(Frame {
            pixmap: canvas,
            no_signal: false,
        })?;
        Ok(TickOutcome::Rendered)
    }

    /// Most recently published frame, if any tick has completed yet.
    pub fn latest_frame(&self) -> Option<Arc<Frame>> {
        match self.published.lock() {
            Ok(published) => published.clone(),
            Err(_) => None,
        }
    }

    /// Advances to the next enabled visualization and returns its kind.
    pub fn cycle_visualization(&self) -> Result<VisualizationKind> {
        let mut pipeline = self.lock_pipeline()?;
        let kind = pipeline.engine.cycle();
        tracing::debug!(style = %kind, "cycled visualization");
        Ok(kind)
    }

    /// Activates `kind`; false means the current flags disable it and the
    /// selection was left alone.
    pub fn select_visualization(&self, kind: VisualizationKind) -> Result<bool> {
        let mut pipeline = self.lock_pipeline()?;
        Ok(pipeline.engine.select(kind))
    }

    /// Kind of the visualization the next tick will render.
    pub fn active_visualization(&self) -> Result<VisualizationKind> {
        let pipeline = self.lock_pipeline()?;
        Ok(pipeline.engine.active())
    }

    /// Replaces the feature flags filtering the rotation.
    pub fn set_feature_flags(&self, flags: FeatureFlags) -> Result<()> {
        let mut pipeline = self.lock_pipeline()?;
        pipeline.engine.set_flags(flags);
        Ok(())
    }

    fn publish(&self, frame: Frame) -> Result<()> {
        let mut published = self
            .published
            .lock()
            .map_err(|_| WavescopeError::msg("published frame slot has been poisoned"))?;
        *published = Some(Arc::new(frame));
        Ok(())
    }

    fn lock_pipeline(&self) -> Result<MutexGuard<'_, Pipeline>> {
        self.pipeline
            .lock()
            .map_err(|_| WavescopeError::msg("render pipeline state has been poisoned"))
    }
}

impl std::fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("busy", &self.busy.load(Ordering::Relaxed))
            .finish()
    }
}
