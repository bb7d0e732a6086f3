use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::{palette, SmoothedHeights, Visualization, VisualizationKind};
use crate::analysis::Complex32;

const BAR_COUNT: usize = 64;
const GAIN: f32 = 75_000.0;
const MIN_HEIGHT: f32 = 2.0;
const SMOOTHING: f32 = 0.2;
const SHADOW_OFFSET: f32 = 3.0;
const GLOW_ALPHA: f32 = 180.0 / 255.0;
const GLOW_WIDTH: f32 = 6.0;

/// Anti-aliased bars sampled across the lower half of the spectrum, each
/// with a drop shadow and a vertical glow stroke up its centre.
pub(crate) struct GlowSpectrum {
    heights: SmoothedHeights,
    colors: Vec<Color>,
    glow_colors: Vec<Color>,
}

impl GlowSpectrum {
    pub(crate) fn new() -> Self {
        let colors: Vec<Color> = (0..BAR_COUNT)
            .map(|i| palette::bin_color(i, BAR_COUNT))
            .collect();
        let glow_colors = colors
            .iter()
            .map(|c| Color::from_rgba(c.red(), c.green(), c.blue(), GLOW_ALPHA).unwrap_or(*c))
            .collect();
        Self {
            heights: SmoothedHeights::new(BAR_COUNT, SMOOTHING),
            colors,
            glow_colors,
        }
    }
}

impl Visualization for GlowSpectrum {
    fn kind(&self) -> VisualizationKind {
        VisualizationKind::Glow
    }

    fn render(&mut self, spectrum: &[Complex32], canvas: &mut Pixmap) {
        if spectrum.is_empty() {
            return;
        }
        let height = canvas.height() as f32;
        let bar_width = (canvas.width() / BAR_COUNT as u32).max(1) as f32;

        let mut fill = Paint::default();
        fill.anti_alias = true;
        let mut shadow = Paint::default();
        shadow.anti_alias = true;
        shadow.set_color(Color::from_rgba8(0, 0, 0, 50));
        let mut glow = Paint::default();
        glow.anti_alias = true;
        let stroke = Stroke {
            width: GLOW_WIDTH,
            ..Stroke::default()
        };

        for i in 0..BAR_COUNT {
            // The 64 bars sample the lower half of the spectrum rather than
            // mapping bin-for-bin.
            let index = (i * (spectrum.len() / 2) / BAR_COUNT).min(spectrum.len() - 1);
            let target = (spectrum[index].norm() * GAIN).max(MIN_HEIGHT).min(height);
            let bar_height = self.heights.step(i, target);

            let x = i as f32 * bar_width;
            let y = height - bar_height;

            fill.set_color(self.colors[i]);
            if let Some(rect) = Rect::from_xywh(x, y, bar_width - 2.0, bar_height) {
                canvas.fill_rect(rect, &fill, Transform::identity(), None);
            }
            if let Some(rect) = Rect::from_xywh(
                x + SHADOW_OFFSET,
                y + SHADOW_OFFSET,
                bar_width - 2.0,
                bar_height,
            ) {
                canvas.fill_rect(rect, &shadow, Transform::identity(), None);
            }

            let center = x + bar_width * 0.5;
            let mut pb = PathBuilder::new();
            pb.move_to(center, height);
            pb.line_to(center, y + GLOW_WIDTH);
            if let Some(path) = pb.finish() {
                glow.set_color(self.glow_colors[i]);
                canvas.stroke_path(&path, &glow, &stroke, Transform::identity(), None);
            }
        }
    }
}
