//! Core library for the Wavescope audio visualizer.
//!
//! The pipeline runs in three stages: a capture session feeds raw device
//! samples into a shared [`AudioTap`], the [`SpectrumAnalyzer`] turns the
//! most recent window of samples into a complex spectrum, and the
//! [`RenderEngine`] draws that spectrum with one of several switchable
//! strategies. The [`RenderScheduler`] strings the stages together at
//! whatever tick rate the host drives it with; `wavescope-app` is the
//! command line host.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod render;
pub mod scheduler;

pub use analysis::{Complex32, SpectrumAnalyzer, DEFAULT_FFT_SIZE};
pub use audio::{AudioTap, CaptureSession};
pub use config::{FeatureFlags, Settings};
pub use error::{Result, WavescopeError};
pub use render::{RenderEngine, Visualization, VisualizationKind};
pub use scheduler::{Frame, RenderScheduler, TickOutcome};
