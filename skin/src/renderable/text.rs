//! Font-shaped glyphs with solid, gradient or pattern fills

use std::path::Path;
use std::rc::Rc;

use tiny_skia::{
    Color, FilterQuality, GradientStop, LinearGradient, Paint, Pattern, Pixmap, PixmapMut,
    PixmapPaint, Shader, SpreadMode, Transform,
};

use digiclock_types::FillConfig;

use super::raster::RasterGlyph;
use super::transform_scale;
use crate::error::SkinResult;
use crate::geometry::{Point, Rect};
use crate::text::{ShapedText, TextEngine};
use crate::utils::color_from_rgba;

/// Paint source for text coverage
#[derive(Debug, Clone)]
pub enum GlyphFill {
    Solid(Color),
    LinearGradient {
        from: Color,
        to: Color,
        vertical: bool,
    },
    /// Texture tiled in device-independent units
    Pattern(Rc<Pixmap>),
}

impl GlyphFill {
    /// Resolve a fill config, loading pattern textures from disk
    pub fn from_config(config: &FillConfig) -> SkinResult<Self> {
        Ok(match config {
            FillConfig::Solid { color } => GlyphFill::Solid(color_from_rgba(*color)),
            FillConfig::LinearGradient { from, to, vertical } => GlyphFill::LinearGradient {
                from: color_from_rgba(*from),
                to: color_from_rgba(*to),
                vertical: *vertical,
            },
            FillConfig::Pattern { path } => {
                let texture = RasterGlyph::load(Path::new(path), 1.0)?;
                GlyphFill::Pattern(Rc::new(texture.pixmap().clone()))
            }
        })
    }

    /// Shader covering a `width` x `height` pixel box at `scale` px/unit
    fn shader(&self, width: f32, height: f32, scale: f32) -> Option<Shader<'_>> {
        match self {
            GlyphFill::Solid(color) => Some(Shader::SolidColor(*color)),
            GlyphFill::LinearGradient { from, to, vertical } => {
                let end = if *vertical {
                    tiny_skia::Point::from_xy(0.0, height)
                } else {
                    tiny_skia::Point::from_xy(width, 0.0)
                };
                LinearGradient::new(
                    tiny_skia::Point::from_xy(0.0, 0.0),
                    end,
                    vec![GradientStop::new(0.0, *from), GradientStop::new(1.0, *to)],
                    SpreadMode::Pad,
                    Transform::identity(),
                )
            }
            GlyphFill::Pattern(texture) => Some(Pattern::new(
                Pixmap::as_ref(texture),
                SpreadMode::Repeat,
                FilterQuality::Bilinear,
                1.0,
                Transform::from_scale(scale, scale),
            )),
        }
    }
}

/// A shaped text token
#[derive(Debug, Clone)]
pub struct TextGlyph {
    text: String,
    shaped: ShapedText,
    fill: GlyphFill,
    engine: TextEngine,
}

impl TextGlyph {
    pub fn new(text: impl Into<String>, shaped: ShapedText, fill: GlyphFill, engine: TextEngine) -> Self {
        Self {
            text: text.into(),
            shaped,
            fill,
            engine,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.shaped.width, self.shaped.height)
    }

    pub fn advance(&self) -> Point {
        Point::new(self.shaped.width, self.shaped.height)
    }

    /// Glyphs are rasterized at the transform's uniform scale, then mapped
    /// through the full transform.
    pub fn draw(&self, target: &mut PixmapMut, transform: Transform) {
        let scale = transform_scale(&transform);
        if !(scale.is_finite() && scale > 0.0) {
            return;
        }
        let Some(mask) = self.engine.coverage(&self.shaped, scale) else {
            return;
        };
        let Some(mut layer) = Pixmap::new(mask.width(), mask.height()) else {
            return;
        };

        let (width, height) = (mask.width() as f32, mask.height() as f32);
        let Some(shader) = self.fill.shader(width, height, scale) else {
            return;
        };
        let paint = Paint {
            shader,
            anti_alias: false,
            ..Default::default()
        };
        let Some(area) = tiny_skia::Rect::from_xywh(0.0, 0.0, width, height) else {
            return;
        };
        layer.fill_rect(area, &paint, Transform::identity(), Some(&mask));

        target.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            transform.pre_scale(1.0 / scale, 1.0 / scale),
            None,
        );
    }
}
