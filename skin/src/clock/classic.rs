//! The classic skin: formatter → factory → linear layout → effects

use std::borrow::Cow;
use std::rc::Rc;

use chrono::NaiveDateTime;
use hashbrown::HashMap;

use digiclock_types::{GlyphSourceConfig, LineAlignment, Orientation, SkinConfig, TokenTransform};

use super::{ClockRenderable, ClockSkin, SeparatorState};
use crate::effects::{CompositeEffect, Effect};
use crate::error::{SkinError, SkinResult};
use crate::factory::{validate_transform, RenderableFactory};
use crate::formatter::{DateTimeFormatter, Token};
use crate::layout::{line_order, parse_layout_config, stack_lines, LayoutAlgorithm, LinearLayout};
use crate::renderable::Renderable;
use crate::text::TextEngine;

/// Directive the seconds scale factor applies to
const SECONDS_DIRECTIVE: &str = "ss";

pub struct ClassicSkin {
    formatter: DateTimeFormatter,
    factory: RenderableFactory,
    layout: LinearLayout,
    line_alignment: LineAlignment,
    /// Parsed line order, empty for natural order
    layout_config: Vec<usize>,
    custom_separators: Vec<char>,
    token_transforms: HashMap<String, TokenTransform>,
    item_effects: CompositeEffect,
    layout_effects: CompositeEffect,
    separator: SeparatorState,
}

impl ClassicSkin {
    /// Skin with the default format, horizontal layout and no effects
    pub fn new(factory: RenderableFactory) -> Self {
        Self {
            formatter: DateTimeFormatter::default(),
            factory,
            layout: LinearLayout::default(),
            line_alignment: LineAlignment::default(),
            layout_config: Vec::new(),
            custom_separators: Vec::new(),
            token_transforms: HashMap::new(),
            item_effects: CompositeEffect::new(),
            layout_effects: CompositeEffect::new(),
            separator: SeparatorState::default(),
        }
    }

    /// Build a skin from persisted configuration. Invalid values are logged
    /// and replaced by their defaults so a bad config still shows a clock.
    pub fn from_config(config: &SkinConfig, engine: TextEngine) -> Self {
        let factory =
            RenderableFactory::with_cache_limit(config.glyphs.clone(), engine, config.cache_entries);
        let mut skin = Self::new(factory);

        skin.formatter = match DateTimeFormatter::new(&config.time_format) {
            Ok(formatter) => formatter,
            Err(e) => {
                tracing::warn!(format = %config.time_format, error = %e, "Invalid time format, rendering leniently");
                DateTimeFormatter::lenient(&config.time_format)
            }
        };

        if let Err(e) = skin.set_layout_config(&config.layout_config) {
            tracing::warn!(error = %e, "Ignoring layout config");
        }

        if let Some(seconds) = config.seconds_transform()
            && let Err(e) = skin.set_token_transform(SECONDS_DIRECTIVE, Some(seconds))
        {
            tracing::warn!(factor = config.seconds_scale_factor, error = %e, "Ignoring seconds scale");
        }
        for (directive, transform) in &config.token_transforms {
            if let Err(e) = skin.set_token_transform(directive, Some(*transform)) {
                tracing::warn!(directive = %directive, error = %e, "Ignoring token transform");
            }
        }

        skin.set_custom_separators(&config.custom_separators);
        skin.layout = LinearLayout::new(config.orientation, 0.0);
        if let Err(e) = skin.set_spacing(config.spacing) {
            tracing::warn!(error = %e, "Ignoring spacing");
        }
        skin.line_alignment = config.line_alignment;
        skin.item_effects = CompositeEffect::from_configs(&config.item_effects);
        skin.layout_effects = CompositeEffect::from_configs(&config.layout_effects);
        skin.separator = skin.separator.with_animation(config.separator_animation);

        tracing::debug!(
            format = skin.formatter.format_string(),
            lines = skin.formatter.line_count(),
            item_effects = skin.item_effects.len(),
            layout_effects = skin.layout_effects.len(),
            "Classic skin configured"
        );
        skin
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutators (take effect on the next process)
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the format string. Invalid formats leave the old one active.
    pub fn set_format(&mut self, format: &str) -> SkinResult<()> {
        self.formatter = DateTimeFormatter::new(format)?;
        Ok(())
    }

    pub fn format(&self) -> &str {
        self.formatter.format_string()
    }

    /// The n-th separator is drawn with the n-th character; an empty string
    /// restores the original separators.
    pub fn set_custom_separators(&mut self, separators: &str) {
        self.custom_separators = separators.chars().collect();
    }

    /// Set (or with `None` remove) the transform for a directive such as "ss"
    pub fn set_token_transform(&mut self, directive: &str, transform: Option<TokenTransform>) -> SkinResult<()> {
        match transform {
            Some(t) => {
                validate_transform(&t)?;
                self.token_transforms.insert(directive.to_string(), t);
            }
            None => {
                self.token_transforms.remove(directive);
            }
        }
        Ok(())
    }

    pub fn token_transform(&self, directive: &str) -> Option<TokenTransform> {
        self.token_transforms.get(directive).copied()
    }

    /// Line order as digits, e.g. "10" puts the second line first
    pub fn set_layout_config(&mut self, config: &str) -> SkinResult<()> {
        self.layout_config = parse_layout_config(config)?;
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.layout.orientation = orientation;
    }

    pub fn set_spacing(&mut self, spacing: f32) -> SkinResult<()> {
        if !spacing.is_finite() {
            return Err(SkinError::invalid(format!("spacing must be finite, got {spacing}")));
        }
        self.layout.spacing = spacing;
        Ok(())
    }

    pub fn set_line_alignment(&mut self, alignment: LineAlignment) {
        self.line_alignment = alignment;
    }

    pub fn add_item_effect(&mut self, effect: Effect) {
        self.item_effects.add_effect(effect);
    }

    pub fn add_layout_effect(&mut self, effect: Effect) {
        self.layout_effects.add_effect(effect);
    }

    pub fn clear_item_effects(&mut self) {
        self.item_effects.clear_effects();
    }

    pub fn clear_layout_effects(&mut self) {
        self.layout_effects.clear_effects();
    }

    pub fn set_glyph_source(&mut self, source: GlyphSourceConfig) -> SkinResult<()> {
        self.factory.set_source(source)
    }

    pub fn factory(&self) -> &RenderableFactory {
        &self.factory
    }

    pub fn separator_state(&self) -> SeparatorState {
        self.separator
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline
    // ─────────────────────────────────────────────────────────────────────────

    fn render_token(&mut self, token: &Token, separator_index: &mut usize) -> Rc<Renderable> {
        let mut text = Cow::Borrowed(token.text.as_str());
        if token.is_separator() {
            if let Some(custom) = self.custom_separators.get(*separator_index) {
                text = Cow::Owned(custom.to_string());
            }
            *separator_index += 1;
        }

        let transform = token
            .directive_name()
            .and_then(|name| self.token_transforms.get(name).copied());
        let glyph = self.factory.create_or_placeholder(&text, transform);

        if token.is_separator() && !self.separator.is_visible() {
            return RenderableFactory::empty_like(&glyph);
        }
        self.item_effects.wrap(glyph)
    }
}

impl ClockSkin for ClassicSkin {
    fn process(&mut self, dt: &NaiveDateTime) -> ClockRenderable {
        let token_lines = self.formatter.format(dt);

        let mut separator_index = 0;
        let mut lines = Vec::with_capacity(token_lines.len());
        for tokens in &token_lines {
            let mut items = Vec::with_capacity(tokens.len());
            for token in tokens {
                items.push(self.render_token(token, &mut separator_index));
            }
            lines.push(Rc::new(Renderable::Composite(self.layout.arrange(&items))));
        }

        let order = line_order(&self.layout_config, lines.len());
        let stacked = stack_lines(&lines, &order, self.layout.orientation, self.line_alignment);
        let placed = stacked.children().to_vec();
        let root = self
            .layout_effects
            .wrap(Rc::new(Renderable::Composite(stacked)));

        ClockRenderable::new(root, placed)
    }

    fn supports_separator_animation(&self) -> bool {
        self.formatter.has_separators()
    }

    fn set_separator_animation_enabled(&mut self, enabled: bool) {
        self.separator = self.separator.with_animation(enabled);
    }

    fn animate_separator(&mut self) {
        self.separator = self.separator.toggled();
    }

    fn separator_visible(&self) -> bool {
        self.separator.is_visible()
    }
}
