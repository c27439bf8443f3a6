use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::consts::{
    COLOR_HISTOGRAM_BINS, EDGE_BLUR_SIGMA, EDGE_MAGNITUDE_THRESHOLD, EPSILON, PHASH_BLOCK,
    PHASH_SIZE,
};
use crate::filters::edges::gradient_magnitude_array;
use crate::filters::gaussian_blur::gaussian_blur_array;
use crate::grid::{quantize, ExclusionMask, PixelGrid};

/// Similarity measures in [0, 1] (1 = identical). Informational only; they do
/// not feed the difference score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerceptualMetrics {
    /// Mean per-channel histogram correlation.
    pub color_similarity: f64,
    /// Intersection-over-union of Sobel edge maps.
    pub edge_similarity: f64,
    /// 1 - normalized Hamming distance of 64-bit DCT hashes.
    pub phash_similarity: f64,
    pub overall: f64,
}

/// Compare two same-sized grids. Excluded pixels are blacked out in both.
pub fn perceptual_similarity(
    a: &PixelGrid,
    b: &PixelGrid,
    mask: &ExclusionMask,
) -> PerceptualMetrics {
    let a = blackout(a, mask);
    let b = blackout(b, mask);
    let (lum_a, lum_b) = (a.luminance(), b.luminance());

    let color_similarity = color_similarity(&a, &b);
    let edge_similarity = edge_similarity(&lum_a, &lum_b);
    let phash_similarity = phash_similarity(&lum_a, &lum_b);

    PerceptualMetrics {
        color_similarity,
        edge_similarity,
        phash_similarity,
        overall: (color_similarity + edge_similarity + phash_similarity) / 3.0,
    }
}

fn blackout(grid: &PixelGrid, mask: &ExclusionMask) -> PixelGrid {
    grid.map_channels(|ch| {
        let mut out = ch.clone();
        Zip::from(&mut out).and(mask).for_each(|v, &excluded| {
            if excluded {
                *v = 0.0;
            }
        });
        out
    })
}

fn color_similarity(a: &PixelGrid, b: &PixelGrid) -> f64 {
    let sum: f64 = a
        .channels()
        .iter()
        .zip(b.channels().iter())
        .map(|(ca, cb)| correlation(&histogram(ca), &histogram(cb)).max(0.0))
        .sum();
    sum / 3.0
}

/// Normalized 8-bit level histogram.
fn histogram(channel: &Array2<f32>) -> Vec<f64> {
    let mut bins = vec![0.0f64; COLOR_HISTOGRAM_BINS];
    for &v in channel {
        bins[quantize(v) as usize] += 1.0;
    }
    let total = channel.len().max(1) as f64;
    bins.iter_mut().for_each(|b| *b /= total);
    bins
}

/// Pearson correlation of two equally long series.
fn correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom < EPSILON as f64 {
        return if x == y { 1.0 } else { 0.0 };
    }
    cov / denom
}

fn edge_similarity(lum_a: &Array2<f32>, lum_b: &Array2<f32>) -> f64 {
    let edges = |lum: &Array2<f32>| {
        gradient_magnitude_array(&gaussian_blur_array(lum, EDGE_BLUR_SIGMA))
            .mapv(|m| m > EDGE_MAGNITUDE_THRESHOLD)
    };
    let (ea, eb) = (edges(lum_a), edges(lum_b));

    let mut intersection = 0usize;
    let mut union = 0usize;
    Zip::from(&ea).and(&eb).for_each(|&x, &y| {
        if x && y {
            intersection += 1;
        }
        if x || y {
            union += 1;
        }
    });

    if union == 0 {
        return 1.0;
    }
    intersection as f64 / union as f64
}

fn phash_similarity(lum_a: &Array2<f32>, lum_b: &Array2<f32>) -> f64 {
    let hamming = (phash(lum_a) ^ phash(lum_b)).count_ones();
    let bits = (PHASH_BLOCK * PHASH_BLOCK) as f64;
    (1.0 - hamming as f64 / bits).max(0.0)
}

/// 64-bit perceptual hash: low-frequency DCT block of a 32x32 thumbnail,
/// thresholded against its median.
fn phash(lum: &Array2<f32>) -> u64 {
    let (h, w) = lum.dim();
    let img: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(w as u32, h as u32, |x, y| Luma([lum[[y as usize, x as usize]]]));
    let thumb = imageops::resize(&img, PHASH_SIZE as u32, PHASH_SIZE as u32, FilterType::Triangle);

    let pixels = Array2::from_shape_fn((PHASH_SIZE, PHASH_SIZE), |(r, c)| {
        thumb.get_pixel(c as u32, r as u32).0[0] as f64 * 255.0
    });
    let coeffs = dct_low_block(&pixels, PHASH_BLOCK);

    let mut sorted = coeffs.clone();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = (sorted[mid - 1] + sorted[mid]) / 2.0;

    coeffs
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > median)
        .fold(0u64, |hash, (i, _)| hash | (1 << i))
}

/// Top-left `block x block` coefficients of the orthonormal 2-D DCT-II,
/// row-major.
fn dct_low_block(pixels: &Array2<f64>, block: usize) -> Vec<f64> {
    let n = pixels.nrows();
    let basis = Array2::from_shape_fn((block, n), |(k, x)| {
        let scale = if k == 0 {
            (1.0 / n as f64).sqrt()
        } else {
            (2.0 / n as f64).sqrt()
        };
        scale * (std::f64::consts::PI * (2 * x + 1) as f64 * k as f64 / (2 * n) as f64).cos()
    });

    // C * P * C^T restricted to the first `block` rows of C.
    let coeffs = basis.dot(pixels).dot(&basis.t());
    coeffs.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_identical_series() {
        let x = vec![0.1, 0.4, 0.2, 0.3];
        assert!((correlation(&x, &x) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dct_of_constant_is_dc_only() {
        let pixels = Array2::from_elem((32, 32), 10.0);
        let coeffs = dct_low_block(&pixels, 8);
        assert!((coeffs[0] - 320.0).abs() < 1e-9, "got: {}", coeffs[0]);
        assert!(coeffs[1..].iter().all(|c| c.abs() < 1e-9));
    }
}
