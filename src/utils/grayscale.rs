/// Luminance extraction from RGBA8 pixels
/// Y = round(0.299*R + 0.587*G + 0.114*B)
///
/// Integer form: Y = (299*R + 587*G + 114*B + 500) / 1000, which is exact
/// half-up rounding of the weighted sum. The weights sum to 1000 so the
/// result never exceeds 255.
use rayon::prelude::*;

/// Coefficients (per mille) for Y = (299*R + 587*G + 114*B) / 1000
const COEF_R: u32 = 299;
const COEF_G: u32 = 587;
const COEF_B: u32 = 114;

/// Images at or above this pixel count are converted row-parallel
pub const PARALLEL_THRESHOLD: usize = 640 * 480;

/// Luma of a single pixel
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32;
    ((sum + 500) / 1000).min(255) as u8
}

/// Convert RGBA to luminance, one byte per pixel (alpha ignored)
pub fn rgba_to_luminance(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    if pixel_count >= PARALLEL_THRESHOLD {
        return rgba_to_luminance_parallel(rgba, width, height);
    }

    rgba.chunks_exact(4)
        .take(pixel_count)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect()
}

/// Convert RGBA to luminance processing rows in parallel
pub fn rgba_to_luminance_parallel(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];
    if width == 0 {
        return gray;
    }

    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let row_start = y * width * 4;
        for (x, out) in row.iter_mut().enumerate() {
            let idx = row_start + x * 4;
            *out = luma(rgba[idx], rgba[idx + 1], rgba[idx + 2]);
        }
    });

    gray
}
