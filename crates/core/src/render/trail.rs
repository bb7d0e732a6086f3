use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::{palette, Visualization, VisualizationKind};
use crate::analysis::Complex32;

const GAIN: f32 = 10_000.0;
const PALETTE_SIZE: usize = 256;

/// Waveform trace drawn segment by segment, sweeping through a 256-entry
/// hue palette from left to right.
pub(crate) struct WaveTrailSpectrum {
    palette: Vec<Color>,
}

impl WaveTrailSpectrum {
    pub(crate) fn new() -> Self {
        Self {
            palette: (0..PALETTE_SIZE)
                .map(|i| palette::bin_color(i, PALETTE_SIZE))
                .collect(),
        }
    }
}

impl Visualization for WaveTrailSpectrum {
    fn kind(&self) -> VisualizationKind {
        VisualizationKind::Trail
    }

    fn render(&mut self, spectrum: &[Complex32], canvas: &mut Pixmap) {
        if spectrum.len() < 2 {
            return;
        }
        let width = canvas.width() as f32;
        let height = canvas.height() as f32;

        let points: Vec<(f32, f32)> = spectrum
            .iter()
            .enumerate()
            .map(|(i, bin)| {
                (
                    i as f32 * width / spectrum.len() as f32,
                    height - (bin.norm() * GAIN).min(height),
                )
            })
            .collect();

        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        let mut paint = Paint::default();

        for i in 1..points.len() {
            let (x0, y0) = points[i - 1];
            let (x1, y1) = points[i];
            let mut pb = PathBuilder::new();
            pb.move_to(x0, y0);
            pb.line_to(x1, y1);
            if let Some(path) = pb.finish() {
                paint.set_color(self.palette[i % PALETTE_SIZE]);
                canvas.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Pixmap;

    #[test]
    fn rendering_is_stateless() {
        let mut trail = WaveTrailSpectrum::new();
        let spectrum: Vec<Complex32> = (0..300)
            .map(|i| Complex32::new((i % 11) as f32 * 1e-4, 0.0))
            .collect();

        let mut first = Pixmap::new(150, 80).unwrap();
        let mut second = Pixmap::new(150, 80).unwrap();
        trail.render(&spectrum, &mut first);
        trail.render(&spectrum, &mut second);

        assert!(first.data().iter().any(|&byte| byte != 0));
        assert_eq!(first.data(), second.data());
    }

    #[test]
    fn segments_pick_up_different_palette_entries() {
        let mut trail = WaveTrailSpectrum::new();
        let spectrum = vec![Complex32::new(0.0, 0.0); 256];
        let mut canvas = Pixmap::new(256, 32).unwrap();
        trail.render(&spectrum, &mut canvas);

        // A flat trace along the bottom edge runs through the hue sweep, so
        // distant columns end up with different colours.
        let early = canvas.pixel(10, 31).unwrap();
        let late = canvas.pixel(200, 31).unwrap();
        assert!(early.alpha() > 0);
        assert!(late.alpha() > 0);
        assert_ne!(
            (early.red(), early.green(), early.blue()),
            (late.red(), late.green(), late.blue())
        );
    }
}
