//! Token text → renderable glyphs, memoized per configuration
//!
//! The factory resolves a token (`"09"`, `":"`, `"PM"`) against the active
//! glyph source:
//!
//! - **Raster**: one PNG per character in an asset directory
//! - **Vector**: one SVG per character in an asset directory
//! - **Text**: the token shaped with a font and painted with a fill
//!
//! Asset file names are derived from the character: digits keep their value,
//! `:` is `sep`, space is `space`, letters are lowercased and anything else
//! is `u` + hex code point (`u2022.png`). A whole-token asset such as
//! `am.png` wins over per-character composition.
//!
//! Results are cached by (token text, source fingerprint, token transform).

use std::path::{Path, PathBuf};
use std::rc::Rc;

use hashbrown::HashMap;

use digiclock_types::{
    FillConfig, GlyphSourceConfig, TokenTransform, DEFAULT_CACHE_ENTRIES, DEFAULT_FONT_SIZE,
};

use crate::cache::{CacheStats, GlyphKey, RenderableCache};
use crate::error::{SkinError, SkinResult};
use crate::geometry::{Point, Rect, Size};
use crate::hasher::Fingerprint;
use crate::layout::{LayoutAlgorithm, LinearLayout};
use crate::renderable::{
    EmptyGlyph, GlyphFill, MissingGlyph, RasterGlyph, Renderable, TextGlyph,
    TransformedRenderable, VectorGlyph,
};
use crate::text::TextEngine;

/// Glyph box assumed before any glyph has been built
const FALLBACK_GLYPH_SIZE: Size = Size::new(DEFAULT_FONT_SIZE * 0.6, DEFAULT_FONT_SIZE * 1.2);

/// Whitespace without an asset advances by this share of the nominal width
const WHITESPACE_ADVANCE: f32 = 0.5;

/// Builds and caches renderables for token text
pub struct RenderableFactory {
    source: GlyphSourceConfig,
    source_key: u64,
    /// Resolved fill for text sources
    fill: GlyphFill,
    engine: TextEngine,
    cache: RenderableCache,
    /// Size of the most recently built glyph, used for placeholders
    nominal: Size,
    /// Placeholders for keys that failed to build, reused until the source
    /// changes or the cache is cleared
    placeholders: HashMap<GlyphKey, Rc<Renderable>>,
}

impl RenderableFactory {
    /// Create a factory. A text fill that fails to load falls back to the
    /// default fill with a warning.
    pub fn new(source: GlyphSourceConfig, engine: TextEngine) -> Self {
        Self::with_cache_limit(source, engine, DEFAULT_CACHE_ENTRIES)
    }

    pub fn with_cache_limit(source: GlyphSourceConfig, engine: TextEngine, cache_entries: usize) -> Self {
        let fill = match resolve_fill(&source) {
            Ok(fill) => fill,
            Err(e) => {
                tracing::warn!(error = %e, "Glyph fill unavailable, using default");
                default_fill()
            }
        };
        let mut factory = Self {
            source_key: source.fingerprint(),
            nominal: nominal_size(&source),
            source,
            fill,
            engine,
            cache: RenderableCache::new(cache_entries),
            placeholders: HashMap::new(),
        };
        factory.check_font();
        factory
    }

    pub fn source(&self) -> &GlyphSourceConfig {
        &self.source
    }

    pub fn engine(&self) -> &TextEngine {
        &self.engine
    }

    /// Switch glyph source. Cached glyphs of the old source are never
    /// returned for the new one.
    pub fn set_source(&mut self, source: GlyphSourceConfig) -> SkinResult<()> {
        if let GlyphSourceConfig::Raster {
            device_pixel_ratio, ..
        } = &source
            && !(device_pixel_ratio.is_finite() && *device_pixel_ratio > 0.0)
        {
            return Err(SkinError::invalid(format!(
                "device pixel ratio must be positive, got {device_pixel_ratio}"
            )));
        }
        let fill = resolve_fill(&source)?;

        tracing::debug!(source = ?source, "Glyph source changed");
        self.fill = fill;
        self.source_key = source.fingerprint();
        self.nominal = nominal_size(&source);
        self.source = source;
        self.placeholders.clear();
        self.check_font();
        Ok(())
    }

    /// Build (or fetch from cache) the renderable for `text`
    pub fn create(&mut self, text: &str, transform: Option<TokenTransform>) -> SkinResult<Rc<Renderable>> {
        let transform = transform.filter(|t| !t.is_identity());
        if let Some(t) = &transform {
            validate_transform(t)?;
        }

        let key = self.cache_key(text, transform.as_ref());
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let base = Rc::new(self.build(text)?);
        let renderable = match transform {
            Some(t) => Rc::new(Renderable::Transformed(TransformedRenderable::new(base, t))),
            None => base,
        };

        self.cache.insert(key, renderable.clone());
        Ok(renderable)
    }

    /// Like [`create`](Self::create), but a failure yields a visible
    /// placeholder sized like the last good glyph. The first placeholder for
    /// a key is kept, so a missing asset is looked up once per source.
    pub fn create_or_placeholder(&mut self, text: &str, transform: Option<TokenTransform>) -> Rc<Renderable> {
        let key = self.cache_key(text, transform.filter(|t| !t.is_identity()).as_ref());
        if let Some(placeholder) = self.placeholders.get(&key) {
            return placeholder.clone();
        }
        match self.create(text, transform) {
            Ok(renderable) => renderable,
            Err(e) => {
                tracing::warn!(token = text, error = %e, "Glyph unavailable, drawing placeholder");
                let placeholder = Rc::new(self.placeholder(text));
                self.placeholders.insert(key, placeholder.clone());
                placeholder
            }
        }
    }

    /// Invisible glyph with the same geometry as `renderable`
    pub fn empty_like(renderable: &Renderable) -> Rc<Renderable> {
        Rc::new(Renderable::Empty(EmptyGlyph::new(
            renderable.rect(),
            renderable.advance(),
        )))
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop cached glyphs and placeholders; missing assets are retried
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.placeholders.clear();
    }

    fn cache_key(&self, text: &str, transform: Option<&TokenTransform>) -> GlyphKey {
        GlyphKey {
            text: text.to_string(),
            source: self.source_key,
            transform: transform.copied().fingerprint(),
        }
    }

    fn placeholder(&self, text: &str) -> Renderable {
        let chars = text.chars().count().max(1) as f32;
        Renderable::Missing(MissingGlyph::new(
            text,
            Rect::new(0.0, 0.0, self.nominal.width * chars, self.nominal.height),
        ))
    }

    fn build(&mut self, text: &str) -> SkinResult<Renderable> {
        let source = self.source.clone();
        let renderable = match &source {
            GlyphSourceConfig::Raster {
                path,
                device_pixel_ratio,
            } => {
                let dpr = *device_pixel_ratio;
                let dir = PathBuf::from(path);
                self.build_from_assets(text, &dir, "png", |p| {
                    RasterGlyph::load(p, dpr).map(Renderable::Raster)
                })?
            }
            GlyphSourceConfig::Vector { path } => {
                let dir = PathBuf::from(path);
                self.build_from_assets(text, &dir, "svg", |p| {
                    VectorGlyph::load(p).map(Renderable::Vector)
                })?
            }
            GlyphSourceConfig::Text { font, .. } => {
                let shaped = self.engine.shape(text, font)?;
                Renderable::Text(TextGlyph::new(
                    text,
                    shaped,
                    self.fill.clone(),
                    self.engine.clone(),
                ))
            }
        };

        let rect = renderable.rect();
        if !rect.is_empty() && text.chars().count() == 1 {
            self.nominal = rect.size();
        }
        tracing::debug!(token = text, kind = renderable.kind(), ?rect, "Built glyph");
        Ok(renderable)
    }

    fn build_from_assets(
        &mut self,
        text: &str,
        dir: &Path,
        ext: &str,
        load: impl Fn(&Path) -> SkinResult<Renderable>,
    ) -> SkinResult<Renderable> {
        if text.chars().count() > 1
            && let Some(stem) = token_stem(text)
        {
            let whole = dir.join(format!("{stem}.{ext}"));
            if whole.is_file() {
                return load(&whole);
            }
        }

        let mut glyphs = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let path = dir.join(format!("{}.{ext}", char_stem(ch)));
            let glyph = if ch.is_whitespace() && !path.is_file() {
                let advance = self.nominal.width * WHITESPACE_ADVANCE;
                Renderable::Empty(EmptyGlyph::new(
                    Rect::new(0.0, 0.0, advance, self.nominal.height),
                    Point::new(advance, self.nominal.height),
                ))
            } else {
                let glyph = load(&path)?;
                self.nominal = glyph.rect().size();
                glyph
            };
            glyphs.push(glyph);
        }

        if glyphs.len() > 1 {
            let glyphs: Vec<_> = glyphs.into_iter().map(Rc::new).collect();
            return Ok(Renderable::Composite(
                LinearLayout::horizontal(0.0).arrange(&glyphs),
            ));
        }
        Ok(glyphs
            .pop()
            .unwrap_or(Renderable::Empty(EmptyGlyph::new(Rect::ZERO, Point::ZERO))))
    }

    fn check_font(&self) {
        if let GlyphSourceConfig::Text { font, .. } = &self.source
            && !self.engine.has_family(&font.family)
        {
            tracing::warn!(family = %font.family, "Font family not installed, using fallback font");
        }
    }
}

/// Reject transforms that would collapse or flip glyphs
pub fn validate_transform(transform: &TokenTransform) -> SkinResult<()> {
    let values = [transform.scale_x, transform.scale_y, transform.dx, transform.dy];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(SkinError::invalid("token transform values must be finite"));
    }
    if transform.scale_x <= 0.0 || transform.scale_y <= 0.0 {
        return Err(SkinError::invalid(format!(
            "token transform scale must be positive, got ({}, {})",
            transform.scale_x, transform.scale_y
        )));
    }
    Ok(())
}

/// Asset file stem for a single character
pub fn char_stem(ch: char) -> String {
    match ch {
        '0'..='9' => ch.to_string(),
        ':' => "sep".to_string(),
        ' ' => "space".to_string(),
        c if c.is_ascii_alphabetic() => c.to_ascii_lowercase().to_string(),
        c => format!("u{:04x}", c as u32),
    }
}

/// Asset file stem for a whole token, if it can have one
fn token_stem(text: &str) -> Option<String> {
    text.chars()
        .all(|c| c.is_ascii_alphanumeric())
        .then(|| text.to_ascii_lowercase())
}

fn resolve_fill(source: &GlyphSourceConfig) -> SkinResult<GlyphFill> {
    match source {
        GlyphSourceConfig::Text { fill, .. } => GlyphFill::from_config(fill),
        _ => Ok(default_fill()),
    }
}

fn default_fill() -> GlyphFill {
    // solid fills cannot fail to resolve
    GlyphFill::from_config(&FillConfig::default())
        .unwrap_or(GlyphFill::Solid(tiny_skia::Color::WHITE))
}

fn nominal_size(source: &GlyphSourceConfig) -> Size {
    match source {
        GlyphSourceConfig::Text { font, .. } => Size::new(font.size * 0.6, font.size * 1.2),
        _ => FALLBACK_GLYPH_SIZE,
    }
}
