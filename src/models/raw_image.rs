use crate::error::LoadError;
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;

/// Decoded RGBA8 image, row-major, immutable once constructed
///
/// Every ladder stage produces its own `RawImage`; nothing hands out a
/// mutable view of the pixels, so stages never alias each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    buffer: RgbaImage,
}

impl RawImage {
    /// Wrap an RGBA8 buffer of `width * height * 4` bytes
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, LoadError> {
        if width == 0 || height == 0 {
            return Err(LoadError::CorruptData(format!(
                "image has zero size ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * 4;
        let actual = rgba.len();
        let buffer = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
            LoadError::CorruptData(format!(
                "pixel buffer holds {actual} bytes, expected {expected}"
            ))
        })?;
        Ok(Self { buffer })
    }

    /// Convert any decoded image to RGBA8
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self, LoadError> {
        Self::from_rgba(image.to_rgba8())
    }

    pub(crate) fn from_rgba(buffer: RgbaImage) -> Result<Self, LoadError> {
        if buffer.width() == 0 || buffer.height() == 0 {
            return Err(LoadError::CorruptData(format!(
                "image has zero size ({}x{})",
                buffer.width(),
                buffer.height()
            )));
        }
        Ok(Self { buffer })
    }

    /// Rebuild an image of the same size from a per-pixel map over RGBA.
    ///
    /// Always allocates a fresh buffer.
    pub(crate) fn map_pixels<F>(&self, mut f: F) -> Self
    where
        F: FnMut([u8; 4]) -> [u8; 4],
    {
        let buffer = RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            Rgba(f(self.buffer.get_pixel(x, y).0))
        });
        Self { buffer }
    }

    /// Build an image with the same dimensions as `self` from a per-coordinate map
    pub(crate) fn generate<F>(&self, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let buffer = RgbaImage::from_fn(self.width(), self.height(), |x, y| Rgba(f(x, y)));
        Self { buffer }
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Raw RGBA8 bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// RGBA value at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    /// Borrow as an `image` buffer
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Write the image as PNG; used for diagnostic stage dumps
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save_with_format(path, image::ImageFormat::Png)
    }
}
