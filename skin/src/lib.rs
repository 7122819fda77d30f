//! Digiclock skin pipeline
//!
//! Turns a timestamp into a paintable clock scene.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      clock/                         │
//! │        ClockSkin, ClassicSkin, SeparatorState       │
//! │       (timestamp → ClockRenderable, blinking)       │
//! ├─────────────────────────────────────────────────────┤
//! │      formatter          layout          effects     │
//! │   tokens per line   linear + lines   layer effects  │
//! ├─────────────────────────────────────────────────────┤
//! │                factory + cache                      │
//! │     token text → Rc<Renderable> (raster/svg/text)   │
//! ├─────────────────────────────────────────────────────┤
//! │                   renderable/                       │
//! │   glyph variants, composites, offscreen layers      │
//! ├─────────────────────────────────────────────────────┤
//! │          tiny-skia + cosmic-text + resvg            │
//! │               (drawing primitives)                  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is single-threaded: renderables are shared through `Rc`
//! and the text engine sits behind a `RefCell`.

pub mod cache;
pub mod clock;
pub mod effects;
pub mod error;
pub mod factory;
pub mod format_options;
pub mod formatter;
pub mod geometry;
pub mod hasher;
pub mod layout;
pub mod renderable;
pub mod text;
pub mod utils;


// Re-export commonly used types
pub use clock::{ClassicSkin, ClockRenderable, ClockSkin, SeparatorState};
pub use effects::{CompositeEffect, Effect};
pub use error::{SkinError, SkinResult};
pub use factory::RenderableFactory;
pub use format_options::TimeFormatOptions;
pub use formatter::{DateTimeFormatter, Token, TokenKind};
pub use geometry::{Point, Rect, Size};
pub use layout::{LayoutAlgorithm, LinearLayout};
pub use renderable::Renderable;
pub use text::TextEngine;

// Re-export tiny_skia for hosts painting the scene
pub use tiny_skia;
