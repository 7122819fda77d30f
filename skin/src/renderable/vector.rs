//! SVG glyphs rendered through resvg

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use resvg::usvg;
use tiny_skia::{PixmapMut, Transform};

use crate::error::{SkinError, SkinResult};
use crate::geometry::{Point, Rect, Size};

/// A parsed SVG glyph, drawn at its natural size in device-independent units
#[derive(Clone)]
pub struct VectorGlyph {
    tree: Rc<usvg::Tree>,
    size: Size,
}

impl VectorGlyph {
    pub fn load(path: &Path) -> SkinResult<Self> {
        if !path.is_file() {
            return Err(SkinError::AssetMissing {
                path: path.to_path_buf(),
            });
        }
        let data = std::fs::read(path).map_err(|source| SkinError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_data(&data).map_err(|e| match e {
            SkinError::ParseError { reason, .. } => {
                SkinError::parse(path.display().to_string(), reason)
            }
            other => other,
        })
    }

    pub fn from_data(data: &[u8]) -> SkinResult<Self> {
        let options = usvg::Options::default();
        let tree =
            usvg::Tree::from_data(data, &options).map_err(|e| SkinError::parse("svg", e.to_string()))?;

        let size = tree.size();
        Ok(Self {
            size: Size::new(size.width(), size.height()),
            tree: Rc::new(tree),
        })
    }

    pub fn natural_size(&self) -> Size {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::from_size(self.size)
    }

    pub fn advance(&self) -> Point {
        Point::new(self.size.width, self.size.height)
    }

    pub fn draw(&self, target: &mut PixmapMut, transform: Transform) {
        resvg::render(&self.tree, transform, target);
    }
}

impl fmt::Debug for VectorGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorGlyph")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Pixmap;

    const BAR_SVG: &[u8] = br##"
        <svg xmlns="http://www.w3.org/2000/svg" width="10" height="20" viewBox="0 0 10 20">
            <rect x="0" y="0" width="10" height="20" fill="#00ff00"/>
        </svg>
    "##;

    #[test]
    fn test_natural_size() {
        let glyph = VectorGlyph::from_data(BAR_SVG).unwrap();
        assert_eq!(glyph.rect(), Rect::new(0.0, 0.0, 10.0, 20.0));
        assert_eq!(glyph.advance(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_draw_at_scale() {
        let glyph = VectorGlyph::from_data(BAR_SVG).unwrap();
        let mut target = Pixmap::new(20, 40).unwrap();
        glyph.draw(&mut target.as_mut(), Transform::from_scale(2.0, 2.0));

        let px = target.pixel(10, 20).unwrap();
        assert_eq!(px.green(), 255);
        assert_eq!(px.alpha(), 255);
    }

    #[test]
    fn test_malformed_svg_is_parse_error() {
        assert!(matches!(
            VectorGlyph::from_data(b"<svg"),
            Err(SkinError::ParseError { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            VectorGlyph::load(&dir.path().join("1.svg")),
            Err(SkinError::AssetMissing { .. })
        ));
    }
}
