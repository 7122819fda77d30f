//! Grouping and per-token transform wrappers

use std::rc::Rc;

use tiny_skia::{PixmapMut, Transform};

use digiclock_types::TokenTransform;

use super::Renderable;
use crate::geometry::{Point, Rect};

/// Children placed at fixed offsets
#[derive(Debug, Clone)]
pub struct CompositeRenderable {
    children: Vec<(Rc<Renderable>, Point)>,
    rect: Rect,
    advance: Point,
}

impl CompositeRenderable {
    /// Group `children`. The bounding box is the union of the placed child
    /// boxes (empty group: zero rect).
    pub fn new(children: Vec<(Rc<Renderable>, Point)>, advance: Point) -> Self {
        let rect = children
            .iter()
            .map(|(child, offset)| child.rect().translated(*offset))
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or(Rect::ZERO);
        Self {
            children,
            rect,
            advance,
        }
    }

    pub fn children(&self) -> &[(Rc<Renderable>, Point)] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Union of the children's paint bounds
    pub fn paint_rect(&self) -> Rect {
        self.children
            .iter()
            .map(|(child, offset)| child.paint_rect().translated(*offset))
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or(Rect::ZERO)
    }

    pub fn advance(&self) -> Point {
        self.advance
    }

    pub fn draw(&self, target: &mut PixmapMut, transform: Transform) {
        for (child, offset) in &self.children {
            child.draw(target, transform.pre_translate(offset.x, offset.y));
        }
    }
}

/// A renderable scaled about its origin, then shifted
#[derive(Debug, Clone)]
pub struct TransformedRenderable {
    inner: Rc<Renderable>,
    transform: TokenTransform,
}

impl TransformedRenderable {
    pub fn new(inner: Rc<Renderable>, transform: TokenTransform) -> Self {
        Self { inner, transform }
    }

    pub fn inner(&self) -> &Rc<Renderable> {
        &self.inner
    }

    pub fn token_transform(&self) -> TokenTransform {
        self.transform
    }

    pub fn rect(&self) -> Rect {
        self.map_rect(self.inner.rect())
    }

    pub fn paint_rect(&self) -> Rect {
        self.map_rect(self.inner.paint_rect())
    }

    fn map_rect(&self, r: Rect) -> Rect {
        let t = &self.transform;
        let (x0, x1) = (r.x * t.scale_x + t.dx, r.right() * t.scale_x + t.dx);
        let (y0, y1) = (r.y * t.scale_y + t.dy, r.bottom() * t.scale_y + t.dy);
        Rect::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs())
    }

    /// Scaled advance. The shift moves the drawing only, not the cursor.
    pub fn advance(&self) -> Point {
        let a = self.inner.advance();
        Point::new(a.x * self.transform.scale_x, a.y * self.transform.scale_y)
    }

    pub fn draw(&self, target: &mut PixmapMut, transform: Transform) {
        let t = &self.transform;
        self.inner.draw(
            target,
            transform.pre_translate(t.dx, t.dy).pre_scale(t.scale_x, t.scale_y),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderable::EmptyGlyph;

    fn block(w: f32, h: f32) -> Rc<Renderable> {
        Rc::new(Renderable::Empty(EmptyGlyph::new(
            Rect::new(0.0, 0.0, w, h),
            Point::new(w, h),
        )))
    }

    #[test]
    fn test_composite_rect_is_union() {
        let group = CompositeRenderable::new(
            vec![
                (block(10.0, 20.0), Point::ZERO),
                (block(5.0, 30.0), Point::new(12.0, -2.0)),
            ],
            Point::new(17.0, 30.0),
        );
        assert_eq!(group.rect(), Rect::new(0.0, -2.0, 17.0, 30.0));
        assert_eq!(group.children().len(), 2);
    }

    #[test]
    fn test_empty_composite() {
        let group = CompositeRenderable::new(Vec::new(), Point::ZERO);
        assert!(group.is_empty());
        assert_eq!(group.rect(), Rect::ZERO);
    }

    #[test]
    fn test_transformed_geometry() {
        let t = TokenTransform::from_scale(0.5, 0.5).with_shift(0.0, 4.0);
        let wrapped = TransformedRenderable::new(block(20.0, 40.0), t);
        assert_eq!(wrapped.rect(), Rect::new(0.0, 4.0, 10.0, 20.0));
        assert_eq!(wrapped.advance(), Point::new(10.0, 20.0));
    }
}
