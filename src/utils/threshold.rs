/// Build a 256-bin histogram of gray values
pub fn histogram(gray: &[u8]) -> [u32; 256] {
    let mut histogram = [0u32; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }
    histogram
}

/// Calculate Otsu's optimal threshold from a histogram
///
/// Scans `t` upward keeping the running background weight and intensity
/// sum. Pixels `<= t` form the background class. The first `t` reaching the
/// maximum between-class variance wins; later ties never replace it.
/// Returns 0 for an empty or single-valued histogram.
pub fn otsu_threshold(histogram: &[u32; 256]) -> u8 {
    let total: u64 = histogram.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0;
    }
    let sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut weight_b = 0u64;
    let mut sum_b = 0.0f64;
    let mut max_variance = 0.0f64;
    let mut threshold = 0u8;

    for (t, &count) in histogram.iter().enumerate() {
        weight_b += count as u64;
        if weight_b == 0 {
            continue;
        }
        let weight_f = total - weight_b;
        if weight_f == 0 {
            break;
        }

        sum_b += t as f64 * count as f64;
        let mean_b = sum_b / weight_b as f64;
        let mean_f = (sum - sum_b) / weight_f as f64;
        let diff = mean_b - mean_f;
        let variance = weight_b as f64 * weight_f as f64 * diff * diff;

        if variance > max_variance {
            max_variance = variance;
            threshold = t as u8;
        }
    }

    threshold
}

/// Map each gray value to 255 when above `cutoff`, else 0
#[inline]
pub fn binary_level(gray: u8, cutoff: u8) -> u8 {
    if gray > cutoff { 255 } else { 0 }
}
