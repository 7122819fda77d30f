//! Glyphs that occupy space without real content

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, PixmapMut, Stroke, Transform};

use crate::geometry::{Point, Rect};
use crate::utils::{missing_glyph_color, rounded_rect_path};

/// Invisible glyph: hidden separators and whitespace without an asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmptyGlyph {
    rect: Rect,
    advance: Point,
}

impl EmptyGlyph {
    pub fn new(rect: Rect, advance: Point) -> Self {
        Self { rect, advance }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn advance(&self) -> Point {
        self.advance
    }
}

/// Visible stand-in for a glyph whose asset failed to load
#[derive(Debug, Clone, PartialEq)]
pub struct MissingGlyph {
    text: String,
    rect: Rect,
}

impl MissingGlyph {
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            text: text.into(),
            rect,
        }
    }

    /// Token text the glyph stands in for
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn advance(&self) -> Point {
        Point::new(self.rect.right(), self.rect.bottom())
    }

    /// Rounded outline with a diagonal cross
    pub fn draw(&self, target: &mut PixmapMut, transform: Transform) {
        let inset = (self.rect.width.min(self.rect.height) * 0.1).max(0.5);
        let (x, y) = (self.rect.x + inset, self.rect.y + inset);
        let (w, h) = (self.rect.width - inset * 2.0, self.rect.height - inset * 2.0);
        if w <= 0.0 || h <= 0.0 {
            return;
        }

        let mut paint = Paint::default();
        paint.set_color(missing_glyph_color());
        paint.anti_alias = true;

        let stroke = Stroke {
            width: inset,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };

        if let Some(outline) = rounded_rect_path(x, y, w, h, inset * 2.0) {
            target.stroke_path(&outline, &paint, &stroke, transform, None);
        }

        let mut pb = PathBuilder::new();
        pb.move_to(x, y);
        pb.line_to(x + w, y + h);
        pb.move_to(x + w, y);
        pb.line_to(x, y + h);
        if let Some(cross) = pb.finish() {
            target.stroke_path(&cross, &paint, &stroke, transform, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Pixmap;

    #[test]
    fn test_missing_glyph_is_visible() {
        let glyph = MissingGlyph::new("7", Rect::new(0.0, 0.0, 20.0, 30.0));
        assert_eq!(glyph.advance(), Point::new(20.0, 30.0));

        let mut target = Pixmap::new(20, 30).unwrap();
        glyph.draw(&mut target.as_mut(), Transform::identity());
        assert!(target.pixels().iter().any(|p| p.alpha() > 0));
    }

    #[test]
    fn test_empty_glyph_keeps_geometry() {
        let glyph = EmptyGlyph::new(Rect::new(0.0, 0.0, 5.0, 10.0), Point::new(5.0, 10.0));
        assert_eq!(glyph.rect().width, 5.0);
        assert_eq!(glyph.advance().y, 10.0);
    }
}
