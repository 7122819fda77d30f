//! Small drawing helpers shared by glyphs and effects

use tiny_skia::{Color, PathBuilder};

use digiclock_types::Color as Rgba;

/// Convert [u8; 4] RGBA array to tiny_skia Color
#[inline]
pub fn color_from_rgba(rgba: Rgba) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Outline color of glyphs that failed to load
#[inline]
pub fn missing_glyph_color() -> Color {
    Color::from_rgba8(230, 40, 40, 220)
}

/// Create a rounded rectangle path
pub fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<tiny_skia::Path> {
    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);

    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);

    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);

    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);

    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);

    pb.close();
    pb.finish()
}

/// Scale every premultiplied channel by `factor` (0.0..=1.0)
pub fn scale_alpha(data: &mut [u8], factor: f32) {
    let factor = factor.clamp(0.0, 1.0);
    if factor >= 1.0 {
        return;
    }
    for byte in data {
        *byte = (*byte as f32 * factor).round() as u8;
    }
}
