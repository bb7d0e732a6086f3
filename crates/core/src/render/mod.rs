//! Visualization strategies and the engine that rotates between them.
//!
//! Every strategy implements [`Visualization`] and draws one frame from a
//! complex spectrum onto a caller-provided pixmap. The [`RenderEngine`]
//! owns one long-lived instance of each strategy so per-strategy state
//! (smoothed bar heights, sine phase, spectrogram history) survives while
//! another strategy is on screen.

use tiny_skia::Pixmap;

use crate::analysis::Complex32;
use crate::config::FeatureFlags;

mod bars;
mod circle;
mod glow;
mod palette;
mod placeholder;
mod sinus;
mod spectrogram;
mod trail;
mod waveform;

use bars::BarSpectrum;
use circle::CircleSpectrum;
use glow::GlowSpectrum;
use sinus::SinusWaveSpectrum;
use spectrogram::SpectrogramSpectrum;
use trail::WaveTrailSpectrum;
use waveform::WaveformSpectrum;

/// A single rendering strategy.
pub trait Visualization: Send {
    /// Stable identity of the strategy.
    fn kind(&self) -> VisualizationKind;

    /// Draws one frame from the complex spectrum onto the canvas. The
    /// canvas arrives already cleared to the frame backdrop.
    fn render(&mut self, spectrum: &[Complex32], canvas: &mut Pixmap);
}

/// Identity of each built-in strategy, in rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationKind {
    Bars,
    Circle,
    Waveform,
    Glow,
    Trail,
    SinusWave,
    Spectrogram,
}

impl VisualizationKind {
    /// Every strategy, in rotation order.
    pub const ALL: [VisualizationKind; 7] = [
        VisualizationKind::Bars,
        VisualizationKind::Circle,
        VisualizationKind::Waveform,
        VisualizationKind::Glow,
        VisualizationKind::Trail,
        VisualizationKind::SinusWave,
        VisualizationKind::Spectrogram,
    ];

    /// Short name used in logs and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            VisualizationKind::Bars => "bars",
            VisualizationKind::Circle => "circle",
            VisualizationKind::Waveform => "waveform",
            VisualizationKind::Glow => "glow",
            VisualizationKind::Trail => "trail",
            VisualizationKind::SinusWave => "sinus",
            VisualizationKind::Spectrogram => "spectrogram",
        }
    }

    /// Parses the name produced by [`VisualizationKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Whether the strategy takes part in the rotation under `flags`.
    /// Bars, circle and waveform are always in.
    fn enabled(self, flags: &FeatureFlags) -> bool {
        match self {
            VisualizationKind::Bars
            | VisualizationKind::Circle
            | VisualizationKind::Waveform => true,
            VisualizationKind::Glow => flags.glow,
            VisualizationKind::Trail => flags.trail,
            VisualizationKind::SinusWave => flags.sinus_wave,
            VisualizationKind::Spectrogram => flags.spectrogram,
        }
    }
}

impl std::fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// First-order low-pass over per-bar heights.
///
/// Each step moves the stored height a fixed fraction towards its target,
/// so bars rise and fall without flickering between noisy frames.
#[derive(Debug, Clone)]
pub(crate) struct SmoothedHeights {
    values: Vec<f32>,
    smoothing: f32,
}

impl SmoothedHeights {
    pub(crate) fn new(len: usize, smoothing: f32) -> Self {
        Self {
            values: vec![0.0; len],
            smoothing,
        }
    }

    /// Advances `index` towards `target` and returns the new height.
    pub(crate) fn step(&mut self, index: usize, target: f32) -> f32 {
        let value = &mut self.values[index];
        *value += (target - *value) * self.smoothing;
        *value
    }
}

/// Owns every strategy instance and the rotation between them.
pub struct RenderEngine {
    strategies: Vec<Box<dyn Visualization>>,
    active: usize,
    flags: FeatureFlags,
}

impl RenderEngine {
    /// Builds the engine with one instance of every strategy. `flags`
    /// filters the rotation; bars start out active.
    pub fn new(flags: FeatureFlags) -> Self {
        let strategies: Vec<Box<dyn Visualization>> = vec![
            Box::new(BarSpectrum::new()),
            Box::new(CircleSpectrum::new()),
            Box::new(WaveformSpectrum::new()),
            Box::new(GlowSpectrum::new()),
            Box::new(WaveTrailSpectrum::new()),
            Box::new(SinusWaveSpectrum::new()),
            Box::new(SpectrogramSpectrum::new()),
        ];
        Self {
            strategies,
            active: 0,
            flags,
        }
    }

    /// Kind of the currently active strategy.
    pub fn active(&self) -> VisualizationKind {
        self.strategies[self.active].kind()
    }

    /// Replaces the feature flags filtering the rotation.
    ///
    /// The active strategy stays on screen even if it just became
    /// disabled; it drops out of the rotation at the next [`cycle`].
    ///
    /// [`cycle`]: RenderEngine::cycle
    pub fn set_flags(&mut self, flags: FeatureFlags) {
        self.flags = flags;
    }

    /// Advances to the next enabled strategy in rotation order and returns
    /// its kind. When the active strategy is no longer enabled, the
    /// rotation restarts from the first enabled one.
    pub fn cycle(&mut self) -> VisualizationKind {
        let rotation: Vec<usize> = (0..self.strategies.len())
            .filter(|&i| self.strategies[i].kind().enabled(&self.flags))
            .collect();
        if let Some(&first) = rotation.first() {
            self.active = match rotation.iter().position(|&i| i == self.active) {
                Some(pos) => rotation[(pos + 1) % rotation.len()],
                None => first,
            };
        }
        self.active()
    }

    /// Activates `kind`. Returns false, leaving the selection unchanged,
    /// when the strategy is disabled by the current flags.
    pub fn select(&mut self, kind: VisualizationKind) -> bool {
        if !kind.enabled(&self.flags) {
            return false;
        }
        match self.strategies.iter().position(|s| s.kind() == kind) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    /// Renders one frame with the active strategy.
    pub fn render(&mut self, spectrum: &[Complex32], canvas: &mut Pixmap) {
        self.strategies[self.active].render(spectrum, canvas);
    }

    /// Draws the no-signal placeholder frame.
    pub fn render_placeholder(&self, canvas: &mut Pixmap) {
        placeholder::draw_no_signal(canvas);
    }
}

impl std::fmt::Debug for RenderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderEngine")
            .field("active", &self.active())
            .field("flags", &self.flags)
            .finish()
    }
}
