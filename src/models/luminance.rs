use crate::models::RawImage;
use crate::utils::grayscale::rgba_to_luminance;

/// 8-bit luminance plane, row-major, one byte per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuminanceMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl LuminanceMatrix {
    /// Extract luminance from an RGBA image
    pub fn from_image(image: &RawImage) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        Self {
            width,
            height,
            data: rgba_to_luminance(image.pixels(), width, height),
        }
    }

    /// Build from an existing luminance plane.
    ///
    /// Returns `None` when `data.len() != width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Luminance at (x, y)
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Row `y` as a slice
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.data[start..start + self.width])
    }

    /// The whole plane
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Minimum, maximum and mean luminance
    pub fn stats(&self) -> (u8, u8, u8) {
        if self.data.is_empty() {
            return (0, 0, 0);
        }
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        let mut sum = 0u64;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
            sum += v as u64;
        }
        (min, max, (sum / self.data.len() as u64) as u8)
    }
}
