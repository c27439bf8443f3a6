use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::{PARALLEL_PIXEL_THRESHOLD, SSIM_DATA_RANGE, SSIM_K1, SSIM_K2, SSIM_WINDOW_SIZE};
use crate::grid::ExclusionMask;

/// Summed-area table with one row/column of zero padding.
struct IntegralImage {
    sums: Array2<f64>,
}

impl IntegralImage {
    fn from_fn(h: usize, w: usize, value: impl Fn(usize, usize) -> f64) -> Self {
        let mut sums = Array2::<f64>::zeros((h + 1, w + 1));
        for row in 0..h {
            let mut row_acc = 0.0f64;
            for col in 0..w {
                row_acc += value(row, col);
                sums[[row + 1, col + 1]] = sums[[row, col + 1]] + row_acc;
            }
        }
        Self { sums }
    }

    /// Sum over rows `r0..r1` and columns `c0..c1` (exclusive ends).
    fn window(&self, r0: usize, c0: usize, r1: usize, c1: usize) -> f64 {
        self.sums[[r1, c1]] - self.sums[[r0, c1]] - self.sums[[r1, c0]] + self.sums[[r0, c0]]
    }
}

/// Largest odd window side not exceeding the default or the image.
pub fn effective_window(h: usize, w: usize) -> usize {
    let side = SSIM_WINDOW_SIZE.min(h).min(w).max(1);
    if side % 2 == 0 {
        side - 1
    } else {
        side
    }
}

/// Mean structural similarity of two luminance images in [0.0, 1.0].
///
/// Uses a uniform `7x7` window (smaller for tiny images), `K1 = 0.01`,
/// `K2 = 0.03`, `data_range = 1.0` and sample (N-1) statistics. Windows are
/// centred where they fit entirely inside the image. Each window's SSIM is
/// weighted by the fraction of its pixels that are not excluded; fully
/// excluded windows carry no weight. With no weighted window at all the
/// images are considered identical (1.0).
pub fn masked_ssim(a: &Array2<f32>, b: &Array2<f32>, mask: &ExclusionMask) -> f64 {
    let (h, w) = a.dim();
    if h == 0 || w == 0 {
        return 1.0;
    }

    let win = effective_window(h, w);
    let pad = win / 2;
    let n = (win * win) as f64;
    let c1 = (SSIM_K1 * SSIM_DATA_RANGE).powi(2);
    let c2 = (SSIM_K2 * SSIM_DATA_RANGE).powi(2);
    let cov_norm = if n > 1.0 { 1.0 / (n - 1.0) } else { 0.0 };

    let sum_a = IntegralImage::from_fn(h, w, |r, c| a[[r, c]] as f64);
    let sum_b = IntegralImage::from_fn(h, w, |r, c| b[[r, c]] as f64);
    let sum_aa = IntegralImage::from_fn(h, w, |r, c| (a[[r, c]] as f64).powi(2));
    let sum_bb = IntegralImage::from_fn(h, w, |r, c| (b[[r, c]] as f64).powi(2));
    let sum_ab = IntegralImage::from_fn(h, w, |r, c| a[[r, c]] as f64 * b[[r, c]] as f64);
    let included = IntegralImage::from_fn(h, w, |r, c| if mask[[r, c]] { 0.0 } else { 1.0 });

    let row_acc = |row: usize| -> (f64, f64) {
        let (r0, r1) = (row - pad, row + pad + 1);
        let mut weighted = 0.0f64;
        let mut weight_sum = 0.0f64;

        for col in pad..w - pad {
            let (c0, c1w) = (col - pad, col + pad + 1);
            let weight = included.window(r0, c0, r1, c1w) / n;
            if weight <= 0.0 {
                continue;
            }

            let sa = sum_a.window(r0, c0, r1, c1w);
            let sb = sum_b.window(r0, c0, r1, c1w);
            let mu_a = sa / n;
            let mu_b = sb / n;
            let var_a = ((sum_aa.window(r0, c0, r1, c1w) - sa * mu_a) * cov_norm).max(0.0);
            let var_b = ((sum_bb.window(r0, c0, r1, c1w) - sb * mu_b) * cov_norm).max(0.0);
            let cov = (sum_ab.window(r0, c0, r1, c1w) - sa * mu_b) * cov_norm;

            let numerator = (2.0 * mu_a * mu_b + c1) * (2.0 * cov + c2);
            let denominator = (mu_a * mu_a + mu_b * mu_b + c1) * (var_a + var_b + c2);

            weighted += weight * numerator / denominator;
            weight_sum += weight;
        }
        (weighted, weight_sum)
    };

    let rows = pad..h - pad;
    let (weighted, weight_sum) = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        rows.into_par_iter()
            .map(row_acc)
            .reduce(|| (0.0, 0.0), |x, y| (x.0 + y.0, x.1 + y.1))
    } else {
        rows.map(row_acc).fold((0.0, 0.0), |x, y| (x.0 + y.0, x.1 + y.1))
    };

    if weight_sum <= 0.0 {
        return 1.0;
    }
    weighted / weight_sum
}
