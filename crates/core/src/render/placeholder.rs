//! The frame shown while no audio has arrived yet.

use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

const GRID_STEP: usize = 20;
const CAPTION: &str = "NO AUDIO / WAITING...";
const GLYPH_SCALE: f32 = 2.0;

/// Draws the waiting-for-audio frame: a dim grid plus a caption in the top
/// left corner. The caller has already cleared the canvas to the backdrop.
pub(crate) fn draw_no_signal(canvas: &mut Pixmap) {
    let width = canvas.width();
    let height = canvas.height();

    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(169, 169, 169, 255));
    let stroke = Stroke {
        width: 2.0,
        ..Stroke::default()
    };

    let mut pb = PathBuilder::new();
    for x in (0..width).step_by(GRID_STEP) {
        pb.move_to(x as f32, 0.0);
        pb.line_to(x as f32, height as f32);
    }
    for y in (0..height).step_by(GRID_STEP) {
        pb.move_to(0.0, y as f32);
        pb.line_to(width as f32, y as f32);
    }
    if let Some(path) = pb.finish() {
        canvas.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    let mut text = Paint::default();
    text.set_color(Color::from_rgba8(211, 211, 211, 255));
    draw_text(canvas, CAPTION, 10.0, 10.0, GLYPH_SCALE, &text);
}

/// Rasterizes `text` from a built-in 5x7 glyph set, one filled square per
/// set bit. Characters without a glyph advance the pen silently.
fn draw_text(canvas: &mut Pixmap, text: &str, x: f32, y: f32, scale: f32, paint: &Paint) {
    let mut pen_x = x;
    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..5u8 {
                    if bits & (0b1_0000 >> col) != 0 {
                        if let Some(rect) = Rect::from_xywh(
                            pen_x + col as f32 * scale,
                            y + row as f32 * scale,
                            scale,
                            scale,
                        ) {
                            canvas.fill_rect(rect, paint, Transform::identity(), None);
                        }
                    }
                }
            }
        }
        pen_x += 6.0 * scale;
    }
}

/// 5x7 row bitmaps for the handful of characters the caption needs, most
/// significant bit leftmost.
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_and_caption_are_drawn_over_the_backdrop() {
        let mut canvas = Pixmap::new(100, 80).unwrap();
        canvas.fill(Color::from_rgba8(0, 0, 0, 30));
        draw_no_signal(&mut canvas);

        // Grid lines run every 20 px in both directions.
        assert_eq!(canvas.pixel(0, 40).unwrap().alpha(), 255);
        assert_eq!(canvas.pixel(40, 70).unwrap().alpha(), 255);

        // Pixels away from the grid and the caption keep the backdrop.
        let off = canvas.pixel(13, 35).unwrap();
        assert_eq!(off.alpha(), 30);
        assert_eq!(off.red(), 0);
    }

    #[test]
    fn caption_glyphs_cover_known_cells() {
        let mut canvas = Pixmap::new(300, 40).unwrap();
        draw_no_signal(&mut canvas);

        // 'N' starts at (10, 10); its top-left cell spans 2x2 pixels.
        let px = canvas.pixel(10, 10).unwrap();
        assert!(px.red() > 200);
    }
}
