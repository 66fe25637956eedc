//! Pixel-level building blocks for the ladder stages.
//!
//! Every function takes `&RawImage` and returns a new image. Alpha is
//! carried through untouched.

use crate::models::RawImage;
use crate::utils::grayscale::luma;
use crate::utils::threshold::{binary_level, histogram, otsu_threshold};
use image::imageops::{self, FilterType};

/// Sharpening kernel used by the edge-enhance stage
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 9, -1], [-1, -1, -1]];

/// Replace RGB with the pixel's luma
pub fn grayscale(image: &RawImage) -> RawImage {
    image.map_pixels(|[r, g, b, a]| {
        let y = luma(r, g, b);
        [y, y, y, a]
    })
}

/// Contrast adjustment around mid-gray.
///
/// `strength` lies in `[-1, 1)`; the gain is `(1 + s) / (1 - s)`, so 0.5
/// triples the distance from 127 and 0.8 multiplies it by nine.
pub fn contrast(image: &RawImage, strength: f32) -> RawImage {
    let strength = strength.clamp(-1.0, 0.99);
    let factor = (1.0 + strength) / (1.0 - strength);
    let mut lut = [0u8; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        let adjusted = (factor * (value as f32 - 127.0) + 127.0).floor();
        *slot = adjusted.clamp(0.0, 255.0) as u8;
    }
    image.map_pixels(|[r, g, b, a]| [lut[r as usize], lut[g as usize], lut[b as usize], a])
}

/// Stretch each color channel so its occupied range spans 0..=255.
///
/// A channel with a single value is left as is.
pub fn normalize(image: &RawImage) -> RawImage {
    let mut lo = [u8::MAX; 3];
    let mut hi = [u8::MIN; 3];
    for px in image.pixels().chunks_exact(4) {
        for c in 0..3 {
            lo[c] = lo[c].min(px[c]);
            hi[c] = hi[c].max(px[c]);
        }
    }

    let mut luts = [[0u8; 256]; 3];
    for c in 0..3 {
        let range = hi[c].saturating_sub(lo[c]) as u32;
        for (value, slot) in luts[c].iter_mut().enumerate() {
            *slot = if range == 0 {
                value as u8
            } else {
                let shifted = (value as u32).saturating_sub(lo[c] as u32).min(range);
                ((shifted * 255 + range / 2) / range) as u8
            };
        }
    }

    image.map_pixels(|[r, g, b, a]| {
        [
            luts[0][r as usize],
            luts[1][g as usize],
            luts[2][b as usize],
            a,
        ]
    })
}

/// Grayscale, then split at the Otsu threshold of the gray histogram
pub fn otsu_binarize(image: &RawImage) -> RawImage {
    let gray = grayscale(image);
    let values: Vec<u8> = gray.pixels().chunks_exact(4).map(|px| px[0]).collect();
    let cutoff = otsu_threshold(&histogram(&values));
    fixed_binarize(&gray, cutoff)
}

/// Map a gray image to black/white at a fixed cutoff
pub fn fixed_binarize(gray: &RawImage, cutoff: u8) -> RawImage {
    gray.map_pixels(|[r, _, _, a]| {
        let v = binary_level(r, cutoff);
        [v, v, v, a]
    })
}

/// Shrink to fit within `max_side` x `max_side`, preserving aspect ratio.
///
/// Returns `None` when the image already fits.
pub fn downscale_to_fit(image: &RawImage, max_side: u32) -> Option<RawImage> {
    let (width, height) = (image.width(), image.height());
    if width.max(height) <= max_side {
        return None;
    }
    let scale = (max_side as f64 / width as f64).min(max_side as f64 / height as f64);
    let new_w = ((width as f64 * scale).round() as u32).clamp(1, max_side);
    let new_h = ((height as f64 * scale).round() as u32).clamp(1, max_side);
    let resized = imageops::resize(image.as_rgba(), new_w, new_h, FilterType::Triangle);
    RawImage::from_rgba(resized).ok()
}

/// 3x3 convolution over RGB with edge pixels extended, clamped to 0..=255
pub fn convolve3x3(image: &RawImage, kernel: &[[i32; 3]; 3]) -> RawImage {
    let width = image.width() as i64;
    let height = image.height() as i64;
    let src = image.pixels();

    image.generate(|x, y| {
        let (x, y) = (x as i64, y as i64);
        let mut acc = [0i32; 3];
        for (ky, row) in kernel.iter().enumerate() {
            let sy = (y + ky as i64 - 1).clamp(0, height - 1);
            for (kx, &weight) in row.iter().enumerate() {
                let sx = (x + kx as i64 - 1).clamp(0, width - 1);
                let idx = ((sy * width + sx) * 4) as usize;
                for c in 0..3 {
                    acc[c] += weight * src[idx + c] as i32;
                }
            }
        }
        let alpha = src[((y * width + x) * 4 + 3) as usize];
        [
            acc[0].clamp(0, 255) as u8,
            acc[1].clamp(0, 255) as u8,
            acc[2].clamp(0, 255) as u8,
            alpha,
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_image(width: u32, height: u32, values: &[u8]) -> RawImage {
        let rgba = values.iter().flat_map(|&v| [v, v, v, 255]).collect();
        RawImage::new(width, height, rgba).unwrap()
    }

    fn channel(image: &RawImage) -> Vec<u8> {
        image.pixels().chunks_exact(4).map(|px| px[0]).collect()
    }

    #[test]
    fn test_grayscale_replicates_luma() {
        let image = RawImage::new(1, 1, vec![255, 0, 0, 200]).unwrap();
        assert_eq!(grayscale(&image).pixel(0, 0), [76, 76, 76, 200]);
    }

    #[test]
    fn test_contrast_pushes_away_from_mid_gray() {
        let image = gray_image(3, 1, &[100, 127, 150]);
        let out = channel(&contrast(&image, 0.5));
        // factor 3: 127 + 3*(100-127) = 46, 127 + 3*23 = 196
        assert_eq!(out, vec![46, 127, 196]);
    }

    #[test]
    fn test_contrast_clamps() {
        let image = gray_image(2, 1, &[10, 250]);
        assert_eq!(channel(&contrast(&image, 0.8)), vec![0, 255]);
    }

    #[test]
    fn test_normalize_stretches_range() {
        let image = gray_image(3, 1, &[100, 125, 150]);
        assert_eq!(channel(&normalize(&image)), vec![0, 128, 255]);
    }

    #[test]
    fn test_normalize_flat_image_unchanged() {
        let image = gray_image(2, 2, &[77; 4]);
        assert_eq!(normalize(&image), image);
    }

    #[test]
    fn test_otsu_binarize_splits_classes() {
        let image = gray_image(4, 1, &[20, 30, 200, 210]);
        assert_eq!(channel(&otsu_binarize(&image)), vec![0, 0, 255, 255]);
    }

    #[test]
    fn test_downscale_to_fit() {
        let image = gray_image(1000, 250, &vec![128; 1000 * 250]);
        let small = downscale_to_fit(&image, 500).unwrap();
        assert_eq!((small.width(), small.height()), (500, 125));
        assert!(downscale_to_fit(&small, 500).is_none());
    }

    #[test]
    fn test_downscale_keeps_one_pixel_minimum() {
        let image = gray_image(2000, 1, &vec![0; 2000]);
        let small = downscale_to_fit(&image, 500).unwrap();
        assert_eq!((small.width(), small.height()), (500, 1));
    }

    #[test]
    fn test_sharpen_flat_region_is_identity() {
        let image = gray_image(3, 3, &[90; 9]);
        assert_eq!(convolve3x3(&image, &SHARPEN_KERNEL), image);
    }

    #[test]
    fn test_sharpen_boosts_isolated_pixel() {
        let mut values = [50u8; 9];
        values[4] = 60;
        let image = gray_image(3, 3, &values);
        let out = channel(&convolve3x3(&image, &SHARPEN_KERNEL));
        // center: 9*60 - 8*50 = 140; neighbours: 9*50 - 7*50 - 60 = 40
        assert_eq!(out[4], 140);
        assert_eq!(out[0], 40);
    }

    #[test]
    fn test_single_pixel_convolution() {
        let image = gray_image(1, 1, &[200]);
        // Edge extension makes every tap the pixel itself: sum of weights is 1
        assert_eq!(channel(&convolve3x3(&image, &SHARPEN_KERNEL)), vec![200]);
    }
}
