//! Colour helpers shared by the visualization strategies.

use tiny_skia::Color;

/// Converts HSV (hue in degrees, saturation and value in `[0, 1]`) to an
/// opaque colour. Hue wraps outside `[0, 360)`.
pub(crate) fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Color {
    let hue = (hue % 360.0 + 360.0) % 360.0;
    let sector = (hue / 60.0).floor();
    let fraction = hue / 60.0 - sector;

    let v = value;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - fraction * saturation);
    let t = value * (1.0 - (1.0 - fraction) * saturation);

    let (r, g, b) = match sector as i32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, q, p),
    };
    Color::from_rgba(r, g, b, 1.0).unwrap_or(Color::WHITE)
}

/// Fully saturated hue for `index` out of `count` evenly spaced entries.
pub(crate) fn bin_color(index: usize, count: usize) -> Color {
    hsv_to_rgb(index as f32 / count.max(1) as f32 * 360.0, 1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(color: Color) -> (u8, u8, u8) {
        (
            (color.red() * 255.0).round() as u8,
            (color.green() * 255.0).round() as u8,
            (color.blue() * 255.0).round() as u8,
        )
    }

    #[test]
    fn primary_hues_land_on_primary_colors() {
        assert_eq!(rgb(hsv_to_rgb(0.0, 1.0, 1.0)), (255, 0, 0));
        assert_eq!(rgb(hsv_to_rgb(120.0, 1.0, 1.0)), (0, 255, 0));
        assert_eq!(rgb(hsv_to_rgb(240.0, 1.0, 1.0)), (0, 0, 255));
    }

    #[test]
    fn hue_wraps_around_the_circle() {
        assert_eq!(rgb(hsv_to_rgb(360.0, 1.0, 1.0)), rgb(hsv_to_rgb(0.0, 1.0, 1.0)));
        assert_eq!(rgb(hsv_to_rgb(-120.0, 1.0, 1.0)), rgb(hsv_to_rgb(240.0, 1.0, 1.0)));
    }

    #[test]
    fn zero_saturation_is_grey() {
        let (r, g, b) = rgb(hsv_to_rgb(200.0, 0.0, 0.5));
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn bin_colors_sweep_the_hue_circle() {
        let first = rgb(bin_color(0, 64));
        let mid = rgb(bin_color(32, 64));
        assert_eq!(first, (255, 0, 0));
        assert_ne!(first, mid);
    }
}
