//! Renderable glyphs and composites
//!
//! Every drawable piece of a clock scene is a [`Renderable`]: a closed set of
//! variants that all answer the same three questions.
//!
//! - `rect()`: bounding box in device-independent units (local coordinates)
//! - `advance()`: how far a layout cursor moves after placing it
//! - `draw()`: paint into a pixmap through a transform (local → pixels)
//!
//! Geometry is fixed at construction. Cached glyphs are shared through `Rc`,
//! wrappers (transforms, effects, composites) hold those shared references.
//!
//! # Variants
//!
//! ```text
//! leaves:    Raster (PNG)  Vector (SVG)  Text (shaped font)  Empty  Missing
//! wrappers:  Transformed (token transform)  Effected (effect chain)
//! groups:    Composite (positioned children)
//! ```

mod composite;
mod placeholder;
mod raster;
mod text;
mod vector;

use std::rc::Rc;

use tiny_skia::{Pixmap, PixmapMut, PixmapPaint, Transform};

use crate::effects::CompositeEffect;
use crate::geometry::{Point, Rect};

pub use composite::{CompositeRenderable, TransformedRenderable};
pub use placeholder::{EmptyGlyph, MissingGlyph};
pub use raster::RasterGlyph;
pub use text::{GlyphFill, TextGlyph};
pub use vector::VectorGlyph;

/// A drawable unit with fixed geometry
#[derive(Debug)]
pub enum Renderable {
    Raster(RasterGlyph),
    Vector(VectorGlyph),
    Text(TextGlyph),
    Empty(EmptyGlyph),
    Missing(MissingGlyph),
    Composite(CompositeRenderable),
    Transformed(TransformedRenderable),
    Effected(EffectedRenderable),
}

impl Renderable {
    /// Bounding box in local device-independent coordinates
    pub fn rect(&self) -> Rect {
        match self {
            Renderable::Raster(r) => r.rect(),
            Renderable::Vector(r) => r.rect(),
            Renderable::Text(r) => r.rect(),
            Renderable::Empty(r) => r.rect(),
            Renderable::Missing(r) => r.rect(),
            Renderable::Composite(r) => r.rect(),
            Renderable::Transformed(r) => r.rect(),
            Renderable::Effected(r) => r.inner.rect(),
        }
    }

    /// Cursor movement after this item
    pub fn advance(&self) -> Point {
        match self {
            Renderable::Raster(r) => r.advance(),
            Renderable::Vector(r) => r.advance(),
            Renderable::Text(r) => r.advance(),
            Renderable::Empty(r) => r.advance(),
            Renderable::Missing(r) => r.advance(),
            Renderable::Composite(r) => r.advance(),
            Renderable::Transformed(r) => r.advance(),
            Renderable::Effected(r) => r.inner.advance(),
        }
    }

    /// Paint into `target`. `transform` maps local units to target pixels.
    pub fn draw(&self, target: &mut PixmapMut, transform: Transform) {
        match self {
            Renderable::Raster(r) => r.draw(target, transform),
            Renderable::Vector(r) => r.draw(target, transform),
            Renderable::Text(r) => r.draw(target, transform),
            Renderable::Empty(_) => {}
            Renderable::Missing(r) => r.draw(target, transform),
            Renderable::Composite(r) => r.draw(target, transform),
            Renderable::Transformed(r) => r.draw(target, transform),
            Renderable::Effected(r) => r.effects.draw(&r.inner, target, transform),
        }
    }

    /// Short variant name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Renderable::Raster(_) => "raster",
            Renderable::Vector(_) => "vector",
            Renderable::Text(_) => "text",
            Renderable::Empty(_) => "empty",
            Renderable::Missing(_) => "missing",
            Renderable::Composite(_) => "composite",
            Renderable::Transformed(_) => "transformed",
            Renderable::Effected(_) => "effected",
        }
    }

    /// Area `draw` may touch: the bounding box grown by effect margins.
    /// Layout uses `rect()`; offscreen targets are sized from this.
    pub fn paint_rect(&self) -> Rect {
        match self {
            Renderable::Composite(r) => r.paint_rect(),
            Renderable::Transformed(r) => r.paint_rect(),
            Renderable::Effected(r) => r.inner.paint_rect().inflated(r.effects.margin()),
            _ => self.rect(),
        }
    }

    /// Render into a standalone pixmap sized to the paint bounds at `scale`
    pub fn to_pixmap(&self, scale: f32) -> Option<Pixmap> {
        let mut layer = Layer::new(self.paint_rect(), 0.0, scale)?;
        let local = layer.local_transform();
        self.draw(&mut layer.pixmap.as_mut(), local);
        Some(layer.pixmap)
    }
}

/// A renderable painted through an effect chain
#[derive(Debug)]
pub struct EffectedRenderable {
    pub inner: Rc<Renderable>,
    pub effects: CompositeEffect,
}

impl EffectedRenderable {
    pub fn new(inner: Rc<Renderable>, effects: CompositeEffect) -> Self {
        Self { inner, effects }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layers
// ─────────────────────────────────────────────────────────────────────────────

/// Offscreen pixmap covering a local rectangle at a device scale
pub struct Layer {
    pub pixmap: Pixmap,
    /// Local coordinate of the pixmap's top-left corner
    pub origin: Point,
    /// Pixels per device-independent unit
    pub scale: f32,
}

impl Layer {
    /// Allocate a layer for `rect` grown by `margin`. `None` if it would be empty.
    pub fn new(rect: Rect, margin: f32, scale: f32) -> Option<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return None;
        }
        let area = rect.inflated(margin.max(0.0));
        let width = (area.width * scale).ceil();
        let height = (area.height * scale).ceil();
        if !(width >= 1.0 && height >= 1.0) {
            return None;
        }
        let pixmap = Pixmap::new(width as u32, height as u32)?;
        Some(Self {
            pixmap,
            origin: Point::new(area.x, area.y),
            scale,
        })
    }

    /// Transform from local units to layer pixels
    pub fn local_transform(&self) -> Transform {
        Transform::from_scale(self.scale, self.scale).pre_translate(-self.origin.x, -self.origin.y)
    }

    /// Composite the layer onto `target` where `transform` maps local units to pixels
    pub fn draw_onto(&self, target: &mut PixmapMut, transform: Transform) {
        let to_target = transform
            .pre_translate(self.origin.x, self.origin.y)
            .pre_scale(1.0 / self.scale, 1.0 / self.scale);
        target.draw_pixmap(
            0,
            0,
            self.pixmap.as_ref(),
            &PixmapPaint::default(),
            to_target,
            None,
        );
    }
}

/// Pixels per local unit implied by a transform
pub(crate) fn transform_scale(transform: &Transform) -> f32 {
    let det = transform.sx * transform.sy - transform.kx * transform.ky;
    det.abs().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_geometry() {
        let layer = Layer::new(Rect::new(2.0, 3.0, 10.0, 5.0), 1.0, 2.0).unwrap();
        assert_eq!(layer.pixmap.width(), 24);
        assert_eq!(layer.pixmap.height(), 14);
        assert_eq!(layer.origin, Point::new(1.0, 2.0));

        let mut p = tiny_skia::Point::from_xy(1.0, 2.0);
        layer.local_transform().map_point(&mut p);
        assert_eq!((p.x, p.y), (0.0, 0.0));
    }

    #[test]
    fn test_empty_layer() {
        assert!(Layer::new(Rect::ZERO, 0.0, 1.0).is_none());
        assert!(Layer::new(Rect::new(0.0, 0.0, 4.0, 4.0), 0.0, 0.0).is_none());
    }

    #[test]
    fn test_transform_scale() {
        assert_eq!(transform_scale(&Transform::from_scale(2.0, 2.0)), 2.0);
        assert_eq!(
            transform_scale(&Transform::from_translate(5.0, 5.0).pre_scale(3.0, 3.0)),
            3.0
        );
    }
}
