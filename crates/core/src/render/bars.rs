use tiny_skia::{Color, Paint, Pixmap, Rect, Transform};

use super::{palette, SmoothedHeights, Visualization, VisualizationKind};
use crate::analysis::Complex32;

const BAR_COUNT: usize = 64;
const GAIN: f32 = 10_000.0;
const SMOOTHING: f32 = 0.2;

/// 64 hue-swept bars, one per low-frequency bin, with low-pass smoothed
/// heights.
pub(crate) struct BarSpectrum {
    heights: SmoothedHeights,
    colors: Vec<Color>,
}

impl BarSpectrum {
    pub(crate) fn new() -> Self {
        Self {
            heights: SmoothedHeights::new(BAR_COUNT, SMOOTHING),
            colors: (0..BAR_COUNT)
                .map(|i| palette::bin_color(i, BAR_COUNT))
                .collect(),
        }
    }
}

impl Visualization for BarSpectrum {
    fn kind(&self) -> VisualizationKind {
        VisualizationKind::Bars
    }

    fn render(&mut self, spectrum: &[Complex32], canvas: &mut Pixmap) {
        let height = canvas.height() as f32;
        let bar_width = (canvas.width() / BAR_COUNT as u32).max(1) as f32;
        let mut paint = Paint::default();

        for (i, bin) in spectrum.iter().take(BAR_COUNT).enumerate() {
            let target = (bin.norm() * GAIN).min(height);
            let bar_height = self.heights.step(i, target);

            paint.set_color(self.colors[i]);
            // Canvases narrower than 128 px leave no room for the 2 px
            // gutter; the rect constructor rejects the negative width and
            // the bar is skipped.
            if let Some(rect) = Rect::from_xywh(
                i as f32 * bar_width,
                height - bar_height,
                bar_width - 2.0,
                bar_height,
            ) {
                canvas.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Pixmap;

    #[test]
    fn saturated_bins_fill_the_full_column_once_settled() {
        let mut bars = BarSpectrum::new();
        let spectrum = vec![Complex32::new(1.0, 0.0); 1024];
        let mut canvas = Pixmap::new(256, 100).unwrap();
        for _ in 0..30 {
            bars.render(&spectrum, &mut canvas);
        }

        // Bin zero maps to hue zero, so the left column settles on red from
        // near the top of the canvas down to the bottom row.
        let bottom = canvas.pixel(0, 99).unwrap();
        assert_eq!(bottom.alpha(), 255);
        assert!(bottom.red() > 200);
        let top = canvas.pixel(0, 1).unwrap();
        assert!(top.red() > 200);
    }

    #[test]
    fn heights_are_smoothed_between_frames() {
        let mut bars = BarSpectrum::new();
        let spectrum = vec![Complex32::new(1.0, 0.0); 64];
        let mut canvas = Pixmap::new(256, 100).unwrap();
        bars.render(&spectrum, &mut canvas);

        // One frame in, the bar has only covered a fifth of the way up.
        assert_eq!(canvas.pixel(0, 99).unwrap().alpha(), 255);
        assert_eq!(canvas.pixel(0, 50).unwrap().alpha(), 0);
    }
}
