use tiny_skia::{ColorU8, Pixmap, PixmapPaint, Transform};

use super::{Visualization, VisualizationKind};
use crate::analysis::Complex32;

const GAIN: f32 = 10_000.0;

/// Scrolling time-frequency heat map.
///
/// A history pixmap scrolls one column left per rendered frame and the
/// rightmost column encodes the current magnitudes on a blue-to-red ramp,
/// lowest bin at the bottom. The history persists while other strategies
/// are active; resizing the canvas discards it.
pub(crate) struct SpectrogramSpectrum {
    history: Option<Pixmap>,
}

impl SpectrogramSpectrum {
    pub(crate) fn new() -> Self {
        Self { history: None }
    }
}

impl Visualization for SpectrogramSpectrum {
    fn kind(&self) -> VisualizationKind {
        VisualizationKind::Spectrogram
    }

    fn render(&mut self, spectrum: &[Complex32], canvas: &mut Pixmap) {
        if spectrum.is_empty() {
            return;
        }
        let width = canvas.width();
        let height = canvas.height();

        let stale = self
            .history
            .as_ref()
            .map(|h| h.width() != width || h.height() != height)
            .unwrap_or(true);
        if stale {
            self.history = Pixmap::new(width, height);
        }
        let history = match self.history.as_mut() {
            Some(history) => history,
            None => return,
        };

        let w = width as usize;
        let pixels = history.pixels_mut();
        for row in pixels.chunks_exact_mut(w) {
            row.copy_within(1.., 0);
        }

        let column = w - 1;
        for (i, bin) in spectrum.iter().take(height as usize).enumerate() {
            let magnitude = (bin.norm() * GAIN).min(1.0);
            let brightness = (magnitude * 255.0) as u8;
            let row = height as usize - i - 1;
            pixels[row * w + column] =
                ColorU8::from_rgba(brightness, 0, 255 - brightness, 255).premultiply();
        }

        canvas.draw_pixmap(
            0,
            0,
            history.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent(len: usize) -> Vec<Complex32> {
        vec![Complex32::new(0.0, 0.0); len]
    }

    #[test]
    fn hot_column_scrolls_left_and_falls_off() {
        let mut gram = SpectrogramSpectrum::new();
        let mut hot = silent(8);
        hot[0] = Complex32::new(0.001, 0.0);

        let mut canvas = Pixmap::new(4, 4).unwrap();
        gram.render(&hot, &mut canvas);
        assert!(canvas.pixel(3, 3).unwrap().red() > 200);

        for step in 1..4u32 {
            let mut canvas = Pixmap::new(4, 4).unwrap();
            gram.render(&silent(8), &mut canvas);
            assert!(canvas.pixel(3 - step, 3).unwrap().red() > 200, "step {step}");
        }

        // One more frame pushes the hot column off the left edge.
        let mut canvas = Pixmap::new(4, 4).unwrap();
        gram.render(&silent(8), &mut canvas);
        for x in 0..4 {
            assert!(canvas.pixel(x, 3).unwrap().red() < 50, "column {x}");
        }
    }

    #[test]
    fn silence_paints_the_blue_end_of_the_ramp() {
        let mut gram = SpectrogramSpectrum::new();
        let mut canvas = Pixmap::new(4, 4).unwrap();
        gram.render(&silent(8), &mut canvas);

        let px = canvas.pixel(3, 3).unwrap();
        assert_eq!(px.red(), 0);
        assert_eq!(px.blue(), 255);
        assert_eq!(px.alpha(), 255);
    }

    #[test]
    fn resizing_discards_the_history() {
        let mut gram = SpectrogramSpectrum::new();
        let mut hot = silent(8);
        hot[0] = Complex32::new(0.001, 0.0);

        let mut canvas = Pixmap::new(4, 4).unwrap();
        gram.render(&hot, &mut canvas);

        let mut wider = Pixmap::new(6, 4).unwrap();
        gram.render(&silent(8), &mut wider);
        for x in 0..6 {
            for y in 0..4 {
                assert!(wider.pixel(x, y).unwrap().red() < 50, "pixel {x},{y}");
            }
        }
    }
}
