//! Pixel effects and ordered effect chains
//!
//! An [`Effect`] transforms the rasterized layer of a renderable. The layer
//! covers the renderable's bounding box plus the effect margin, in device
//! pixels, so effects see exactly what would have been drawn.
//!
//! A [`CompositeEffect`] applies its effects in insertion order. Order is
//! observable: opacity followed by recolor does not equal recolor followed
//! by opacity.

use std::fmt;
use std::rc::Rc;

use tiny_skia::{Color, Mask, MaskType, Paint, Pixmap, PixmapMut, PixmapPaint, Transform};

use digiclock_types::EffectConfig;

use crate::renderable::{transform_scale, EffectedRenderable, Layer, Renderable};
use crate::utils::{color_from_rgba, scale_alpha};

/// Layer transform: premultiplied RGBA pixels plus pixels per unit
pub type EffectFn = dyn Fn(&mut Pixmap, f32);

/// A named pixel transform
#[derive(Clone)]
pub struct Effect {
    name: String,
    margin: f32,
    apply: Rc<EffectFn>,
}

impl Effect {
    /// Custom effect. `margin` is the extra room (device-independent units)
    /// the effect may paint outside the bounding box.
    pub fn new(name: impl Into<String>, margin: f32, apply: impl Fn(&mut Pixmap, f32) + 'static) -> Self {
        Self {
            name: name.into(),
            margin: margin.max(0.0),
            apply: Rc::new(apply),
        }
    }

    /// Multiply every pixel by `value`
    pub fn opacity(value: f32) -> Self {
        let value = if value.is_finite() { value.clamp(0.0, 1.0) } else { 1.0 };
        Self::new("opacity", 0.0, move |layer, _| scale_alpha(layer.data_mut(), value))
    }

    /// Paint `color` over the painted pixels only
    pub fn recolor(color: Color) -> Self {
        Self::new("recolor", 0.0, move |layer, _| tint(layer, color))
    }

    /// Copy of the layer in `color`, offset by (`dx`, `dy`) units, beneath it
    pub fn shadow(dx: f32, dy: f32, color: Color) -> Self {
        let margin = dx.abs().max(dy.abs());
        Self::new("shadow", margin, move |layer, scale| {
            drop_shadow(layer, dx * scale, dy * scale, color)
        })
    }

    pub fn from_config(config: &EffectConfig) -> Self {
        match config {
            EffectConfig::Opacity { value } => Self::opacity(*value),
            EffectConfig::Recolor { color } => Self::recolor(color_from_rgba(*color)),
            EffectConfig::Shadow { dx, dy, color } => Self::shadow(*dx, *dy, color_from_rgba(*color)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn apply(&self, layer: &mut Pixmap, scale: f32) {
        (self.apply)(layer, scale);
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("name", &self.name)
            .field("margin", &self.margin)
            .finish_non_exhaustive()
    }
}

fn tint(layer: &mut Pixmap, color: Color) {
    let mask = Mask::from_pixmap(layer.as_ref(), MaskType::Alpha);
    let Some(area) = tiny_skia::Rect::from_xywh(0.0, 0.0, layer.width() as f32, layer.height() as f32)
    else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = false;
    layer.fill_rect(area, &paint, Transform::identity(), Some(&mask));
}

fn drop_shadow(layer: &mut Pixmap, dx: f32, dy: f32, color: Color) {
    let Some(mut shadow) = Pixmap::new(layer.width(), layer.height()) else {
        return;
    };
    let mask = Mask::from_pixmap(layer.as_ref(), MaskType::Alpha);
    let Some(area) = tiny_skia::Rect::from_xywh(0.0, 0.0, layer.width() as f32, layer.height() as f32)
    else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = false;
    shadow.fill_rect(area, &paint, Transform::identity(), Some(&mask));

    let Some(mut result) = Pixmap::new(layer.width(), layer.height()) else {
        return;
    };
    result.draw_pixmap(
        0,
        0,
        shadow.as_ref(),
        &PixmapPaint::default(),
        Transform::from_translate(dx, dy),
        None,
    );
    result.draw_pixmap(0, 0, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    *layer = result;
}

/// Ordered list of effects applied as one
#[derive(Debug, Clone, Default)]
pub struct CompositeEffect {
    effects: Vec<Effect>,
}

impl CompositeEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs(configs: &[EffectConfig]) -> Self {
        Self {
            effects: configs.iter().map(Effect::from_config).collect(),
        }
    }

    /// Append to the end of the chain
    pub fn add_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn clear_effects(&mut self) {
        self.effects.clear();
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Total room the chain may paint outside the bounding box
    pub fn margin(&self) -> f32 {
        self.effects.iter().map(Effect::margin).sum()
    }

    /// Run every effect on `layer`, first added first
    pub fn apply(&self, layer: &mut Pixmap, scale: f32) {
        for effect in &self.effects {
            effect.apply(layer, scale);
        }
    }

    /// Wrap `renderable` so it draws through this chain. An empty chain
    /// returns the renderable unchanged.
    pub fn wrap(&self, renderable: Rc<Renderable>) -> Rc<Renderable> {
        if self.is_empty() {
            return renderable;
        }
        Rc::new(Renderable::Effected(EffectedRenderable::new(renderable, self.clone())))
    }

    /// Draw `inner` into an offscreen layer, run the chain, then composite
    /// the layer onto `target`.
    pub fn draw(&self, inner: &Renderable, target: &mut PixmapMut, transform: Transform) {
        if self.is_empty() {
            inner.draw(target, transform);
            return;
        }
        let scale = transform_scale(&transform);
        let Some(mut layer) = Layer::new(inner.paint_rect(), self.margin(), scale) else {
            return;
        };
        let local = layer.local_transform();
        inner.draw(&mut layer.pixmap.as_mut(), local);
        self.apply(&mut layer.pixmap, scale);
        layer.draw_onto(target, transform);
    }
}
