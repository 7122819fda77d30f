//! Bitmap glyphs decoded from PNG files

use std::path::Path;

use tiny_skia::{FilterQuality, IntSize, Pixmap, PixmapMut, PixmapPaint, Transform};

use crate::error::{SkinError, SkinResult};
use crate::geometry::{Point, Rect};

/// A premultiplied bitmap glyph
///
/// The pixmap holds native pixels. Its device-independent size is the native
/// size divided by `device_pixel_ratio`, so @2x assets take up the same room
/// as @1x ones.
#[derive(Debug, Clone)]
pub struct RasterGlyph {
    pixmap: Pixmap,
    device_pixel_ratio: f32,
}

impl RasterGlyph {
    /// Load and decode a PNG glyph
    pub fn load(path: &Path, device_pixel_ratio: f32) -> SkinResult<Self> {
        if !path.is_file() {
            return Err(SkinError::AssetMissing {
                path: path.to_path_buf(),
            });
        }
        let data = std::fs::read(path).map_err(|source| SkinError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (rgba, width, height) = decode_png(&data).map_err(|reason| SkinError::Decode {
            path: path.to_path_buf(),
            reason,
        })?;
        Self::from_rgba(rgba, width, height, device_pixel_ratio).ok_or_else(|| SkinError::Decode {
            path: path.to_path_buf(),
            reason: "empty image".to_string(),
        })
    }

    /// Wrap straight-alpha RGBA pixels
    pub fn from_rgba(
        mut rgba: Vec<u8>,
        width: u32,
        height: u32,
        device_pixel_ratio: f32,
    ) -> Option<Self> {
        let size = IntSize::from_wh(width, height)?;
        premultiply(&mut rgba);
        let pixmap = Pixmap::from_vec(rgba, size)?;
        Some(Self::from_pixmap(pixmap, device_pixel_ratio))
    }

    pub fn from_pixmap(pixmap: Pixmap, device_pixel_ratio: f32) -> Self {
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            pixmap,
            device_pixel_ratio,
        }
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.pixmap.width() as f32 / self.device_pixel_ratio,
            self.pixmap.height() as f32 / self.device_pixel_ratio,
        )
    }

    pub fn advance(&self) -> Point {
        let rect = self.rect();
        Point::new(rect.width, rect.height)
    }

    pub fn draw(&self, target: &mut PixmapMut, transform: Transform) {
        let paint = PixmapPaint {
            quality: FilterQuality::Bicubic,
            ..Default::default()
        };
        let inv = 1.0 / self.device_pixel_ratio;
        target.draw_pixmap(
            0,
            0,
            self.pixmap.as_ref(),
            &paint,
            transform.pre_scale(inv, inv),
            None,
        );
    }
}

/// Decode PNG bytes into straight-alpha RGBA
pub(crate) fn decode_png(data: &[u8]) -> Result<(Vec<u8>, u32, u32), String> {
    let mut decoder = png::Decoder::new(data);
    // palette -> RGB(A), 16 bit -> 8 bit
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(|e| e.to_string())?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(|e| e.to_string())?;

    let width = info.width;
    let height = info.height;
    let pixels = &buf[..info.buffer_size()];

    let rgba = match info.color_type {
        png::ColorType::Rgba => pixels.to_vec(),
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity((width * height * 4) as usize);
            for chunk in pixels.chunks(3) {
                rgba.extend_from_slice(chunk);
                rgba.push(255);
            }
            rgba
        }
        png::ColorType::GrayscaleAlpha => {
            let mut rgba = Vec::with_capacity((width * height * 4) as usize);
            for chunk in pixels.chunks(2) {
                let (gray, alpha) = (chunk[0], chunk[1]);
                rgba.extend_from_slice(&[gray, gray, gray, alpha]);
            }
            rgba
        }
        png::ColorType::Grayscale => {
            let mut rgba = Vec::with_capacity((width * height * 4) as usize);
            for &gray in pixels {
                rgba.extend_from_slice(&[gray, gray, gray, 255]);
            }
            rgba
        }
        png::ColorType::Indexed => {
            return Err("unexpanded palette image".to_string());
        }
    };

    Ok((rgba, width, height))
}

fn premultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        rgba.iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect()
    }

    #[test]
    fn test_rect_honours_device_pixel_ratio() {
        let glyph = RasterGlyph::from_rgba(solid(20, 40, [255; 4]), 20, 40, 2.0).unwrap();
        assert_eq!(glyph.rect(), Rect::new(0.0, 0.0, 10.0, 20.0));
        assert_eq!(glyph.advance(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_premultiply() {
        let glyph = RasterGlyph::from_rgba(vec![200, 100, 0, 128], 1, 1, 1.0).unwrap();
        assert_eq!(glyph.pixmap().data(), &[100, 50, 0, 128]);
    }

    #[test]
    fn test_png_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.png");
        let mut pixmap = Pixmap::new(3, 5).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        pixmap.save_png(&path).unwrap();

        let glyph = RasterGlyph::load(&path, 1.0).unwrap();
        assert_eq!(glyph.rect(), Rect::new(0.0, 0.0, 3.0, 5.0));
        assert_eq!(&glyph.pixmap().data()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.png");
        assert!(matches!(
            RasterGlyph::load(&missing, 1.0),
            Err(SkinError::AssetMissing { .. })
        ));

        let corrupt = dir.path().join("bad.png");
        std::fs::write(&corrupt, b"not a png").unwrap();
        assert!(matches!(
            RasterGlyph::load(&corrupt, 1.0),
            Err(SkinError::Decode { .. })
        ));
    }

    #[test]
    fn test_draw_scales_to_target() {
        let glyph = RasterGlyph::from_rgba(solid(4, 4, [255, 0, 0, 255]), 4, 4, 2.0).unwrap();
        let mut target = Pixmap::new(8, 8).unwrap();
        glyph.draw(&mut target.as_mut(), Transform::from_scale(2.0, 2.0));
        // 2x2 dip drawn at 2px/dip covers the 4x4 top-left block only
        assert_eq!(target.pixel(1, 1).unwrap().alpha(), 255);
        assert_eq!(target.pixel(6, 6).unwrap().alpha(), 0);
    }
}
