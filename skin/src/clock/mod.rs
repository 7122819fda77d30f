//! Clock skins: timestamp in, paintable scene out
//!
//! A [`ClockSkin`] owns the whole pipeline for one look. The host calls
//! [`ClockSkin::process`] on every tick and [`ClockSkin::animate_separator`]
//! on the blink timer, then paints the returned [`ClockRenderable`].

mod classic;
mod separator;

#[cfg(test)]
mod classic_tests;

use std::rc::Rc;

use chrono::NaiveDateTime;
use tiny_skia::{Pixmap, PixmapMut, Transform};

use crate::geometry::{Point, Rect};
use crate::renderable::Renderable;

pub use classic::ClassicSkin;
pub use separator::SeparatorState;

/// A skin turns timestamps into scenes and owns the separator blink state
pub trait ClockSkin {
    /// Build the scene for `dt` with the current configuration
    fn process(&mut self, dt: &NaiveDateTime) -> ClockRenderable;

    fn supports_separator_animation(&self) -> bool;

    /// Disabling animation leaves separators visible
    fn set_separator_animation_enabled(&mut self, enabled: bool);

    /// Toggle separator visibility (no-op while animation is disabled)
    fn animate_separator(&mut self);

    fn separator_visible(&self) -> bool;
}

/// Composed result of one `process` call
#[derive(Debug, Clone)]
pub struct ClockRenderable {
    root: Rc<Renderable>,
    lines: Vec<(Rc<Renderable>, Point)>,
}

impl ClockRenderable {
    pub(crate) fn new(root: Rc<Renderable>, lines: Vec<(Rc<Renderable>, Point)>) -> Self {
        Self { root, lines }
    }

    /// Bounding box of the whole scene
    pub fn rect(&self) -> Rect {
        self.root.rect()
    }

    /// Area painting may touch, including layout and item effect margins
    pub fn paint_rect(&self) -> Rect {
        self.root.paint_rect()
    }

    pub fn advance(&self) -> Point {
        self.root.advance()
    }

    /// Lines in display order with their offsets
    pub fn lines(&self) -> &[(Rc<Renderable>, Point)] {
        &self.lines
    }

    /// Every placed token glyph with its offset in scene coordinates
    pub fn children(&self) -> Vec<(Rc<Renderable>, Point)> {
        let mut children = Vec::new();
        for (line, line_offset) in &self.lines {
            match line.as_ref() {
                Renderable::Composite(group) => {
                    children.extend(group.children().iter().map(|(child, offset)| {
                        (
                            child.clone(),
                            Point::new(line_offset.x + offset.x, line_offset.y + offset.y),
                        )
                    }));
                }
                _ => children.push((line.clone(), *line_offset)),
            }
        }
        children
    }

    /// The root renderable (lines plus layout effects)
    pub fn root(&self) -> &Rc<Renderable> {
        &self.root
    }

    /// Paint with the scene's local origin at `origin` (target pixels) and
    /// `scale` pixels per unit.
    pub fn draw(&self, target: &mut PixmapMut, origin: (f32, f32), scale: f32) {
        let transform = Transform::from_translate(origin.0, origin.1).pre_scale(scale, scale);
        self.root.draw(target, transform);
    }

    /// Paint into a pixmap that exactly fits the paint bounds
    pub fn to_pixmap(&self, scale: f32) -> Option<Pixmap> {
        self.root.to_pixmap(scale)
    }
}
