use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::{Visualization, VisualizationKind};
use crate::analysis::Complex32;

const GAIN: f32 = 5_000.0;
const SPATIAL_STEP: f32 = 0.1;
const PHASE_STEP: f32 = 0.05;

/// Lime trace that modulates bin magnitudes onto a travelling sine around
/// the vertical midline.
///
/// The phase accumulator advances once per rendered frame, so the wave
/// freezes in place while another strategy is active and resumes when
/// reselected. Magnitudes are deliberately unclamped; hot bins may swing
/// the trace off canvas.
pub(crate) struct SinusWaveSpectrum {
    phase: f32,
}

impl SinusWaveSpectrum {
    pub(crate) fn new() -> Self {
        Self { phase: 0.0 }
    }
}

impl Visualization for SinusWaveSpectrum {
    fn kind(&self) -> VisualizationKind {
        VisualizationKind::SinusWave
    }

    fn render(&mut self, spectrum: &[Complex32], canvas: &mut Pixmap) {
        if spectrum.is_empty() {
            return;
        }
        let width = canvas.width() as f32;
        let midline = canvas.height() as f32 / 2.0;

        let mut pb = PathBuilder::new();
        for (i, bin) in spectrum.iter().enumerate() {
            let x = i as f32 * width / spectrum.len() as f32;
            let y = midline - (i as f32 * SPATIAL_STEP + self.phase).sin() * bin.norm() * GAIN;
            if i == 0 {
                pb.move_to(x, y);
            } else {
                pb.line_to(x, y);
            }
        }

        if spectrum.len() > 1 {
            if let Some(path) = pb.finish() {
                let mut paint = Paint::default();
                paint.set_color(Color::from_rgba8(0, 255, 0, 255));
                let stroke = Stroke {
                    width: 2.0,
                    ..Stroke::default()
                };
                canvas.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }

        self.phase += PHASE_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Pixmap;

    #[test]
    fn phase_advances_once_per_render() {
        let mut sinus = SinusWaveSpectrum::new();
        let spectrum = vec![Complex32::new(0.0001, 0.0); 64];
        let mut canvas = Pixmap::new(64, 64).unwrap();
        sinus.render(&spectrum, &mut canvas);
        sinus.render(&spectrum, &mut canvas);
        assert!((sinus.phase - 2.0 * PHASE_STEP).abs() < 1e-6);
    }

    #[test]
    fn successive_frames_differ_as_the_wave_travels() {
        let mut sinus = SinusWaveSpectrum::new();
        let spectrum = vec![Complex32::new(0.01, 0.0); 256];
        let mut first = Pixmap::new(128, 64).unwrap();
        let mut second = Pixmap::new(128, 64).unwrap();
        sinus.render(&spectrum, &mut first);
        sinus.render(&spectrum, &mut second);
        assert_ne!(first.data(), second.data());
    }

    #[test]
    fn empty_spectra_do_not_advance_the_phase() {
        let mut sinus = SinusWaveSpectrum::new();
        let mut canvas = Pixmap::new(64, 64).unwrap();
        sinus.render(&[], &mut canvas);
        assert_eq!(sinus.phase, 0.0);
    }
}
