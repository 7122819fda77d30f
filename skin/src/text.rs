//! Text shaping and glyph rasterization using cosmic-text
//!
//! The engine is shared between the factory (which shapes token text once per
//! cache miss) and text glyphs (which rasterize their shaped glyphs at draw
//! time for the requested scale). All work happens on the CPU.

use std::cell::RefCell;
use std::rc::Rc;

use cosmic_text::{
    fontdb, Attrs, Buffer, Family, FontSystem, LayoutGlyph, Metrics, Shaping, SwashCache,
    SwashContent, Weight,
};
use tiny_skia::Mask;

use digiclock_types::FontConfig;

use crate::error::{SkinError, SkinResult};

/// Line height relative to font size
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Shaped glyph run of a single token
#[derive(Debug, Clone)]
pub struct ShapedText {
    pub glyphs: Vec<LayoutGlyph>,
    pub width: f32,
    pub height: f32,
    /// Distance from the top of the box to the first baseline
    pub baseline: f32,
}

struct EngineState {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

/// Shared handle to a font system and glyph rasterizer
#[derive(Clone)]
pub struct TextEngine {
    state: Rc<RefCell<EngineState>>,
}

impl TextEngine {
    /// Create an engine over the system fonts
    pub fn new() -> Self {
        Self::from_font_system(FontSystem::new())
    }

    /// Create an engine over an explicit font database
    pub fn with_database(db: fontdb::Database) -> Self {
        let locale = sys_locale::get_locale().unwrap_or_else(|| "en-US".to_string());
        Self::from_font_system(FontSystem::new_with_locale_and_db(locale, db))
    }

    fn from_font_system(font_system: FontSystem) -> Self {
        Self {
            state: Rc::new(RefCell::new(EngineState {
                font_system,
                swash_cache: SwashCache::new(),
            })),
        }
    }

    /// Whether a font family with this name is installed
    pub fn has_family(&self, family: &str) -> bool {
        let state = self.state.borrow();
        state.font_system.db().faces().any(|face| {
            face.families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(family))
        })
    }

    /// Whether the database holds any font face at all
    pub fn has_fonts(&self) -> bool {
        self.state.borrow().font_system.db().len() > 0
    }

    /// Shape `text` with the given font. Unknown families fall back to any
    /// installed face; an empty font database is an error.
    pub fn shape(&self, text: &str, font: &FontConfig) -> SkinResult<ShapedText> {
        if !self.has_fonts() {
            return Err(SkinError::FontUnavailable {
                family: font.family.clone(),
            });
        }
        let mut state = self.state.borrow_mut();
        let font_system = &mut state.font_system;

        let metrics = Metrics::new(font.size, font.size * LINE_HEIGHT_FACTOR);
        let mut buffer = Buffer::new(font_system, metrics);

        let attrs = Attrs::new()
            .family(Family::Name(&font.family))
            .weight(Weight(font.weight));
        buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(font_system, false);

        let mut glyphs = Vec::new();
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        let mut baseline = None;

        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;
            baseline.get_or_insert(run.line_y);
            glyphs.extend(run.glyphs.iter().cloned());
        }

        Ok(ShapedText {
            glyphs,
            width,
            height: height.max(metrics.line_height),
            baseline: baseline.unwrap_or(font.size),
        })
    }

    /// Rasterize the coverage of `shaped` at `scale` into a mask sized to
    /// the scaled text box. Returns `None` for an empty box.
    pub fn coverage(&self, shaped: &ShapedText, scale: f32) -> Option<Mask> {
        let width = (shaped.width * scale).ceil() as u32;
        let height = (shaped.height * scale).ceil() as u32;
        let mut mask = Mask::new(width, height)?;

        let mut state = self.state.borrow_mut();
        let EngineState {
            font_system,
            swash_cache,
        } = &mut *state;

        for glyph in &shaped.glyphs {
            let physical = glyph.physical((0.0, shaped.baseline * scale), scale);
            let Some(image) = swash_cache.get_image(font_system, physical.cache_key) else {
                continue;
            };

            let stride = match image.content {
                SwashContent::Mask => 1,
                SwashContent::Color => 4,
                // subpixel masks are never requested by the swash cache defaults
                SwashContent::SubpixelMask => continue,
            };

            blend_coverage(
                &mut mask,
                &image.data,
                stride,
                image.placement.width,
                image.placement.height,
                physical.x + image.placement.left,
                physical.y - image.placement.top,
            );
        }

        Some(mask)
    }
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine").finish_non_exhaustive()
    }
}

/// Merge a glyph coverage image into the mask (max of both)
fn blend_coverage(
    mask: &mut Mask,
    glyph_data: &[u8],
    stride: usize,
    glyph_width: u32,
    glyph_height: u32,
    dest_x: i32,
    dest_y: i32,
) {
    let mask_width = mask.width() as i32;
    let mask_height = mask.height() as i32;
    let data = mask.data_mut();

    for gy in 0..glyph_height as i32 {
        let py = dest_y + gy;
        if py < 0 || py >= mask_height {
            continue;
        }

        for gx in 0..glyph_width as i32 {
            let px = dest_x + gx;
            if px < 0 || px >= mask_width {
                continue;
            }

            let glyph_idx = (gy as usize * glyph_width as usize + gx as usize) * stride
                + (stride - 1);
            let Some(&alpha) = glyph_data.get(glyph_idx) else {
                continue;
            };
            if alpha == 0 {
                continue;
            }

            let mask_idx = py as usize * mask_width as usize + px as usize;
            data[mask_idx] = data[mask_idx].max(alpha);
        }
    }
}
