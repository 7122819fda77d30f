//! Shared configuration types for digiclock
//!
//! This crate contains serializable configuration types that are shared between
//! the skin pipeline (digiclock-skin) and the command line front-end.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// Color Type
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color as `[r, g, b, a]`
pub type Color = [u8; 4];

pub mod clock_colors {
    use super::Color;

    pub const WHITE: Color = [255, 255, 255, 255];
    pub const BLACK: Color = [0, 0, 0, 255];
    pub const SHADOW: Color = [0, 0, 0, 128];
    pub const GRADIENT_TOP: Color = [255, 196, 64, 255];
    pub const GRADIENT_BOTTOM: Color = [255, 96, 32, 255];
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_TIME_FORMAT: &str = "hh:mm a";
pub const DEFAULT_FONT_FAMILY: &str = "Noto Sans";
pub const DEFAULT_FONT_SIZE: f32 = 48.0;
pub const DEFAULT_FONT_WEIGHT: u16 = 400;
pub const DEFAULT_CACHE_ENTRIES: usize = 256;

fn default_true() -> bool {
    true
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_font_weight() -> u16 {
    DEFAULT_FONT_WEIGHT
}

fn default_scale() -> f32 {
    1.0
}

fn default_seconds_scale() -> u8 {
    100
}

fn default_cache_entries() -> usize {
    DEFAULT_CACHE_ENTRIES
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Primary axis along which glyphs of one line are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The axis lines are stacked on
    pub fn perpendicular(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// How stacked lines are aligned against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAlignment {
    Start,
    #[default]
    Center,
}

/// Per-token geometry override (scale about the glyph origin, then shift)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenTransform {
    #[serde(default = "default_scale")]
    pub scale_x: f32,
    #[serde(default = "default_scale")]
    pub scale_y: f32,
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub dy: f32,
}

impl TokenTransform {
    pub const IDENTITY: TokenTransform = TokenTransform {
        scale_x: 1.0,
        scale_y: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    pub fn from_scale(sx: f32, sy: f32) -> Self {
        Self {
            scale_x: sx,
            scale_y: sy,
            ..Self::IDENTITY
        }
    }

    pub fn with_shift(mut self, dx: f32, dy: f32) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for TokenTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Effects
// ─────────────────────────────────────────────────────────────────────────────

/// A visual effect entry as stored in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectConfig {
    /// Multiply coverage by `value` (0.0 - 1.0)
    Opacity { value: f32 },
    /// Tint painted pixels with `color` (its alpha is the tint strength)
    Recolor { color: Color },
    /// Drop shadow offset by (`dx`, `dy`) device-independent units
    Shadow { dx: f32, dy: f32, color: Color },
}

// ─────────────────────────────────────────────────────────────────────────────
// Glyph Sources
// ─────────────────────────────────────────────────────────────────────────────

/// Fill used by procedurally drawn text glyphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FillConfig {
    Solid {
        color: Color,
    },
    LinearGradient {
        from: Color,
        to: Color,
        #[serde(default = "default_true")]
        vertical: bool,
    },
    /// Tiled PNG texture
    Pattern {
        path: String,
    },
}

impl Default for FillConfig {
    fn default() -> Self {
        FillConfig::Solid {
            color: clock_colors::WHITE,
        }
    }
}

/// Font description for text glyphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    #[serde(default = "default_font_family")]
    pub family: String,
    #[serde(default = "default_font_size")]
    pub size: f32,
    #[serde(default = "default_font_weight")]
    pub weight: u16,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: default_font_family(),
            size: DEFAULT_FONT_SIZE,
            weight: DEFAULT_FONT_WEIGHT,
        }
    }
}

/// Where glyphs come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GlyphSourceConfig {
    /// Directory of PNG glyphs, `device_pixel_ratio` is the density they were drawn for
    Raster {
        path: String,
        #[serde(default = "default_scale")]
        device_pixel_ratio: f32,
    },
    /// Directory of SVG glyphs
    Vector { path: String },
    /// Glyphs drawn from a font
    Text {
        #[serde(default)]
        font: FontConfig,
        #[serde(default)]
        fill: FillConfig,
    },
}

impl Default for GlyphSourceConfig {
    fn default() -> Self {
        GlyphSourceConfig::Text {
            font: FontConfig::default(),
            fill: FillConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Skin Config
// ─────────────────────────────────────────────────────────────────────────────

/// Everything a classic skin needs to turn a timestamp into a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinConfig {
    #[serde(default = "default_time_format")]
    pub time_format: String,
    /// Characters replacing separators in order of appearance
    #[serde(default)]
    pub custom_separators: String,
    /// Size of the seconds glyphs in percent (100 = same as other glyphs)
    #[serde(default = "default_seconds_scale")]
    pub seconds_scale_factor: u8,
    /// Explicit transforms keyed by directive name (e.g. "ss")
    #[serde(default)]
    pub token_transforms: BTreeMap<String, TokenTransform>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub spacing: f32,
    /// Line order for multi-line formats, one digit per line (e.g. "01")
    #[serde(default)]
    pub layout_config: String,
    #[serde(default)]
    pub line_alignment: LineAlignment,
    #[serde(default)]
    pub item_effects: Vec<EffectConfig>,
    #[serde(default)]
    pub layout_effects: Vec<EffectConfig>,
    #[serde(default = "default_true")]
    pub separator_animation: bool,
    #[serde(default)]
    pub glyphs: GlyphSourceConfig,
    #[serde(default = "default_cache_entries")]
    pub cache_entries: usize,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            time_format: default_time_format(),
            custom_separators: String::new(),
            seconds_scale_factor: 100,
            token_transforms: BTreeMap::new(),
            orientation: Orientation::default(),
            spacing: 0.0,
            layout_config: String::new(),
            line_alignment: LineAlignment::default(),
            item_effects: Vec::new(),
            layout_effects: Vec::new(),
            separator_animation: true,
            glyphs: GlyphSourceConfig::default(),
            cache_entries: DEFAULT_CACHE_ENTRIES,
        }
    }
}

impl SkinConfig {
    /// Transform for the seconds glyphs derived from `seconds_scale_factor`
    pub fn seconds_transform(&self) -> Option<TokenTransform> {
        if self.seconds_scale_factor == 100 {
            return None;
        }
        let factor = self.seconds_scale_factor as f32 / 100.0;
        Some(TokenTransform::from_scale(factor, factor))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Config
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub skin: SkinConfig,
    /// Output scale factor (device pixels per device-independent unit)
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Background painted behind the clock when exporting frames
    #[serde(default)]
    pub background: Option<Color>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            skin: SkinConfig::default(),
            scale: 1.0,
            background: None,
        }
    }
}
