//! Linear layout of glyphs and stacking of lines

use std::rc::Rc;

use digiclock_types::{LineAlignment, Orientation};

use crate::error::{SkinError, SkinResult};
use crate::geometry::{Point, Rect};
use crate::renderable::{CompositeRenderable, Renderable};

/// Arranges a sequence of renderables into one composite
pub trait LayoutAlgorithm {
    fn arrange(&self, items: &[Rc<Renderable>]) -> CompositeRenderable;
}

/// Places items one after another along an axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearLayout {
    pub orientation: Orientation,
    /// Extra gap after every item (negative overlaps)
    pub spacing: f32,
}

impl LinearLayout {
    pub fn new(orientation: Orientation, spacing: f32) -> Self {
        Self {
            orientation,
            spacing,
        }
    }

    pub fn horizontal(spacing: f32) -> Self {
        Self::new(Orientation::Horizontal, spacing)
    }

    pub fn vertical(spacing: f32) -> Self {
        Self::new(Orientation::Vertical, spacing)
    }
}

impl LayoutAlgorithm for LinearLayout {
    fn arrange(&self, items: &[Rc<Renderable>]) -> CompositeRenderable {
        let mut cursor = 0.0f32;
        let mut cross_advance = 0.0f32;
        let mut children = Vec::with_capacity(items.len());

        for item in items {
            children.push((item.clone(), point_on(self.orientation, cursor, 0.0)));
            let advance = item.advance();
            cursor += main_of(self.orientation, advance) + self.spacing;
            cross_advance = cross_advance.max(cross_of(self.orientation, advance));
        }

        CompositeRenderable::new(children, point_on(self.orientation, cursor, cross_advance))
    }
}

/// Stack independently arranged lines across the layout axis.
///
/// `order` lists line indices top-to-bottom (or left-to-right for a vertical
/// layout). Each line is aligned along `orientation` within the widest line.
pub fn stack_lines(
    lines: &[Rc<Renderable>],
    order: &[usize],
    orientation: Orientation,
    alignment: LineAlignment,
) -> CompositeRenderable {
    let placed: Vec<&Rc<Renderable>> = order.iter().filter_map(|&i| lines.get(i)).collect();

    let extent = placed
        .iter()
        .map(|line| main_of_rect(orientation, &line.rect()))
        .fold(0.0f32, f32::max);

    let mut cursor = 0.0f32;
    let mut children = Vec::with_capacity(placed.len());
    for line in placed {
        let rect = line.rect();
        let (main_start, main_len) = main_span(orientation, &rect);
        let (cross_start, cross_len) = cross_span(orientation, &rect);

        let main_offset = match alignment {
            LineAlignment::Start => -main_start,
            LineAlignment::Center => (extent - main_len) / 2.0 - main_start,
        };
        children.push((line.clone(), point_on(orientation, main_offset, cursor - cross_start)));
        cursor += cross_len;
    }

    CompositeRenderable::new(children, point_on(orientation, extent, cursor))
}

/// Parse a layout config: each character is a line index digit.
pub fn parse_layout_config(config: &str) -> SkinResult<Vec<usize>> {
    config
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            c.to_digit(10).map(|d| d as usize).ok_or_else(|| {
                SkinError::invalid(format!("layout config '{config}': '{c}' is not a line index"))
            })
        })
        .collect()
}

/// Resolve the line order for `line_count` lines. An empty config means
/// natural order; indices past the last line are skipped.
pub fn line_order(config: &[usize], line_count: usize) -> Vec<usize> {
    if config.is_empty() {
        return (0..line_count).collect();
    }
    config
        .iter()
        .copied()
        .filter(|&index| {
            let valid = index < line_count;
            if !valid {
                tracing::warn!(index, line_count, "Layout config names a missing line, skipping");
            }
            valid
        })
        .collect()
}

#[inline]
fn point_on(orientation: Orientation, main: f32, cross: f32) -> Point {
    match orientation {
        Orientation::Horizontal => Point::new(main, cross),
        Orientation::Vertical => Point::new(cross, main),
    }
}

#[inline]
fn main_of(orientation: Orientation, p: Point) -> f32 {
    match orientation {
        Orientation::Horizontal => p.x,
        Orientation::Vertical => p.y,
    }
}

#[inline]
fn cross_of(orientation: Orientation, p: Point) -> f32 {
    match orientation {
        Orientation::Horizontal => p.y,
        Orientation::Vertical => p.x,
    }
}

fn main_span(orientation: Orientation, rect: &Rect) -> (f32, f32) {
    match orientation {
        Orientation::Horizontal => (rect.x, rect.width),
        Orientation::Vertical => (rect.y, rect.height),
    }
}

fn cross_span(orientation: Orientation, rect: &Rect) -> (f32, f32) {
    match orientation {
        Orientation::Horizontal => (rect.y, rect.height),
        Orientation::Vertical => (rect.x, rect.width),
    }
}

fn main_of_rect(orientation: Orientation, rect: &Rect) -> f32 {
    main_span(orientation, rect).1
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

    fn line(items: &[Rc<Renderable>]) -> Rc<Renderable> {
        Rc::new(Renderable::Composite(LinearLayout::horizontal(0.0).arrange(items)))
    }

    fn offsets(group: &CompositeRenderable) -> Vec<Point> {
        group.children().iter().map(|(_, p)| *p).collect()
    }

    #[test]
    fn test_horizontal_with_spacing() {
        let layout = LinearLayout::horizontal(2.0);
        let group = layout.arrange(&[block(10.0, 20.0), block(5.0, 30.0), block(8.0, 10.0)]);
        assert_eq!(
            offsets(&group),
            vec![Point::new(0.0, 0.0), Point::new(12.0, 0.0), Point::new(19.0, 0.0)]
        );
        assert_eq!(group.rect(), Rect::new(0.0, 0.0, 27.0, 30.0));
        assert_eq!(group.advance(), Point::new(29.0, 30.0));
    }

    #[test]
    fn test_vertical_with_negative_spacing() {
        let layout = LinearLayout::vertical(-4.0);
        let group = layout.arrange(&[block(10.0, 20.0), block(6.0, 20.0)]);
        assert_eq!(offsets(&group), vec![Point::ZERO, Point::new(0.0, 16.0)]);
        assert_eq!(group.rect(), Rect::new(0.0, 0.0, 10.0, 36.0));
    }

    #[test]
    fn test_cursor_uses_advance_not_box() {
        let narrow_advance = Rc::new(Renderable::Empty(EmptyGlyph::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Point::new(4.0, 10.0),
        )));
        let group = LinearLayout::horizontal(0.0).arrange(&[narrow_advance, block(10.0, 10.0)]);
        assert_eq!(offsets(&group)[1], Point::new(4.0, 0.0));
        assert_eq!(group.rect().width, 14.0);
    }

    #[test]
    fn test_empty_input() {
        let group = LinearLayout::horizontal(5.0).arrange(&[]);
        assert!(group.is_empty());
        assert_eq!(group.rect(), Rect::ZERO);
    }

    #[test]
    fn test_stack_lines_centered_in_config_order() {
        let time = line(&[block(40.0, 20.0)]);
        let date = line(&[block(20.0, 10.0)]);
        let lines = [time, date];

        let stacked = stack_lines(&lines, &[1, 0], Orientation::Horizontal, LineAlignment::Center);
        assert_eq!(
            offsets(&stacked),
            vec![Point::new(10.0, 0.0), Point::new(0.0, 10.0)]
        );
        assert_eq!(stacked.rect(), Rect::new(0.0, 0.0, 40.0, 30.0));

        let stacked = stack_lines(&lines, &[0, 1], Orientation::Horizontal, LineAlignment::Start);
        assert_eq!(offsets(&stacked), vec![Point::ZERO, Point::new(0.0, 20.0)]);
    }

    #[test]
    fn test_stack_vertical_lines_side_by_side() {
        let a = Rc::new(Renderable::Composite(
            LinearLayout::vertical(0.0).arrange(&[block(10.0, 30.0)]),
        ));
        let b = Rc::new(Renderable::Composite(
            LinearLayout::vertical(0.0).arrange(&[block(6.0, 10.0)]),
        ));
        let stacked = stack_lines(&[a, b], &[0, 1], Orientation::Vertical, LineAlignment::Center);
        assert_eq!(offsets(&stacked), vec![Point::ZERO, Point::new(10.0, 10.0)]);
    }

    #[test]
    fn test_parse_layout_config() {
        assert_eq!(parse_layout_config("01").unwrap(), vec![0, 1]);
        assert_eq!(parse_layout_config("").unwrap(), Vec::<usize>::new());
        assert!(matches!(
            parse_layout_config("0a"),
            Err(SkinError::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn test_line_order() {
        assert_eq!(line_order(&[], 2), vec![0, 1]);
        assert_eq!(line_order(&[1, 0], 2), vec![1, 0]);
        assert_eq!(line_order(&[0, 3, 1], 2), vec![0, 1]);
    }
}
