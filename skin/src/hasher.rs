//! Content hashing for cache keys
//!
//! Every configuration value that changes how a glyph looks implements
//! [`Fingerprint`]. Hashes are computed with a fixed-key hasher, so two equal
//! inputs produce the same key for the lifetime of the process.

use std::hash::{DefaultHasher, Hash, Hasher};

use digiclock_types::{FillConfig, FontConfig, GlyphSourceConfig, TokenTransform};

/// Hash any `Hash` value (or tuple of values)
pub fn content_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Ordered combination of already computed hashes
pub fn combine(hashes: impl IntoIterator<Item = u64>) -> u64 {
    let mut hasher = DefaultHasher::new();
    for h in hashes {
        hasher.write_u64(h);
    }
    hasher.finish()
}

/// Stable hash of a visual configuration value
pub trait Fingerprint {
    fn fingerprint(&self) -> u64;
}

fn write_f32(hasher: &mut impl Hasher, value: f32) {
    // -0.0 and 0.0 draw the same
    let normalized = if value == 0.0 { 0.0f32 } else { value };
    hasher.write_u32(normalized.to_bits());
}

impl Fingerprint for TokenTransform {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for v in [self.scale_x, self.scale_y, self.dx, self.dy] {
            write_f32(&mut hasher, v);
        }
        hasher.finish()
    }
}

impl Fingerprint for FontConfig {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.family.hash(&mut hasher);
        write_f32(&mut hasher, self.size);
        self.weight.hash(&mut hasher);
        hasher.finish()
    }
}

impl Fingerprint for FillConfig {
    fn fingerprint(&self) -> u64 {
        match self {
            FillConfig::Solid { color } => content_hash(&("solid", color)),
            FillConfig::LinearGradient { from, to, vertical } => {
                content_hash(&("linear", from, to, vertical))
            }
            FillConfig::Pattern { path } => content_hash(&("pattern", path)),
        }
    }
}

impl Fingerprint for GlyphSourceConfig {
    fn fingerprint(&self) -> u64 {
        match self {
            GlyphSourceConfig::Raster {
                path,
                device_pixel_ratio,
            } => {
                let mut hasher = DefaultHasher::new();
                "raster".hash(&mut hasher);
                path.hash(&mut hasher);
                write_f32(&mut hasher, *device_pixel_ratio);
                hasher.finish()
            }
            GlyphSourceConfig::Vector { path } => content_hash(&("vector", path)),
            GlyphSourceConfig::Text { font, fill } => combine([
                content_hash("text"),
                font.fingerprint(),
                fill.fingerprint(),
            ]),
        }
    }
}

impl<T: Fingerprint> Fingerprint for Option<T> {
    fn fingerprint(&self) -> u64 {
        match self {
            Some(value) => combine([1, value.fingerprint()]),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_hash() {
        let a = FontConfig::default();
        let b = FontConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(content_hash("09"), content_hash("09"));
    }

    #[test]
    fn test_visual_change_changes_hash() {
        let a = FontConfig::default();
        let b = FontConfig {
            size: a.size + 1.0,
            ..a.clone()
        };
        assert_ne!(a.fingerprint(), b.fingerprint());

        let red = FillConfig::Solid {
            color: [255, 0, 0, 255],
        };
        let blue = FillConfig::Solid {
            color: [0, 0, 255, 255],
        };
        assert_ne!(red.fingerprint(), blue.fingerprint());
    }

    #[test]
    fn test_combine_is_ordered() {
        assert_ne!(combine([1, 2]), combine([2, 1]));
    }

    #[test]
    fn test_negative_zero_shift() {
        let a = TokenTransform::IDENTITY.with_shift(0.0, 0.0);
        let b = TokenTransform::IDENTITY.with_shift(-0.0, 0.0);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
