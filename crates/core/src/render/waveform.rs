use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::{Visualization, VisualizationKind};
use crate::analysis::Complex32;

const GAIN: f32 = 10_000.0;

/// Cyan magnitude trace across the full spectrum, anchored to the bottom
/// edge.
pub(crate) struct WaveformSpectrum;

impl WaveformSpectrum {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl Visualization for WaveformSpectrum {
    fn kind(&self) -> VisualizationKind {
        VisualizationKind::Waveform
    }

    fn render(&mut self, spectrum: &[Complex32], canvas: &mut Pixmap) {
        if spectrum.len() < 2 {
            return;
        }
        let width = canvas.width() as f32;
        let height = canvas.height() as f32;

        let mut pb = PathBuilder::new();
        for (i, bin) in spectrum.iter().enumerate() {
            let x = i as f32 * width / spectrum.len() as f32;
            let y = height - (bin.norm() * GAIN).min(height);
            if i == 0 {
                pb.move_to(x, y);
            } else {
                pb.line_to(x, y);
            }
        }

        if let Some(path) = pb.finish() {
            let mut paint = Paint::default();
            paint.set_color(Color::from_rgba8(0, 255, 255, 255));
            let stroke = Stroke {
                width: 2.0,
                ..Stroke::default()
            };
            canvas.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}
