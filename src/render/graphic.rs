//! Pixel payloads drawn by scene nodes

use std::rc::Rc;

use anyhow::{Context, Result};

/// A decoded RGBA image.
///
/// Graphics are shared read-only between nodes (a frame list, a tile palette), so
/// the scene graph hands them around as `Rc<Graphic>` and never mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
}

impl Graphic {
    /// Create a fully transparent graphic
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Create a graphic filled with a single colour
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Decode a graphic from PNG bytes
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .context("Failed to decode PNG image")?
            .to_rgba8();

        Ok(Self {
            width: img.width(),
            height: img.height(),
            data: img.into_raw(),
        })
    }

    /// Wrap the graphic for sharing between nodes
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Get a pixel (returns RGBA, transparent black when out of bounds)
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_graphic() {
        let g = Graphic::filled(4, 2, [255, 0, 0, 255]);
        assert_eq!(g.data.len(), 4 * 2 * 4);
        assert_eq!(g.get_pixel(3, 1), [255, 0, 0, 255]);
        assert_eq!(g.get_pixel(4, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_png_roundtrip_dimensions() {
        let img = image::RgbaImage::from_pixel(5, 3, image::Rgba([1, 2, 3, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");

        let g = Graphic::from_png_bytes(&bytes).expect("decode png");
        assert_eq!((g.width, g.height), (5, 3));
        assert_eq!(g.get_pixel(0, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_invalid_png_is_error() {
        assert!(Graphic::from_png_bytes(b"not a png").is_err());
    }
}
