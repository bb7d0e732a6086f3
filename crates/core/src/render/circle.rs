use std::f32::consts::TAU;

use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::{palette, Visualization, VisualizationKind};
use crate::analysis::Complex32;

const BIN_COUNT: usize = 64;
const GAIN: f32 = 5_000.0;
const RIM_MARGIN: f32 = 20.0;

/// 64 radial spokes hanging from a rim circle, pulled inward by their bin
/// magnitudes.
pub(crate) struct CircleSpectrum {
    colors: Vec<Color>,
}

impl CircleSpectrum {
    pub(crate) fn new() -> Self {
        Self {
            colors: (0..BIN_COUNT)
                .map(|i| palette::bin_color(i, BIN_COUNT))
                .collect(),
        }
    }
}

impl Visualization for CircleSpectrum {
    fn kind(&self) -> VisualizationKind {
        VisualizationKind::Circle
    }

    fn render(&mut self, spectrum: &[Complex32], canvas: &mut Pixmap) {
        let cx = canvas.width() as f32 / 2.0;
        let cy = canvas.height() as f32 / 2.0;
        let radius = cx.min(cy) - RIM_MARGIN;
        if radius <= 0.0 {
            return;
        }

        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        let mut paint = Paint::default();

        for (i, bin) in spectrum.iter().take(BIN_COUNT).enumerate() {
            let magnitude = (bin.norm() * GAIN).min(radius);
            let angle = i as f32 * TAU / BIN_COUNT as f32;
            let (sin, cos) = angle.sin_cos();

            let mut pb = PathBuilder::new();
            pb.move_to(
                cx + cos * (radius - magnitude),
                cy + sin * (radius - magnitude),
            );
            pb.line_to(cx + cos * radius, cy + sin * radius);
            if let Some(path) = pb.finish() {
                paint.set_color(self.colors[i]);
                canvas.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }
}
