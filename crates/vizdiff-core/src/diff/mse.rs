use rayon::prelude::*;

use crate::consts::{COLOR_CHANNEL_COUNT, PARALLEL_PIXEL_THRESHOLD};
use crate::grid::{ExclusionMask, PixelGrid};

/// Mean squared error over non-excluded pixels, averaged across R, G, B.
///
/// Intensities are already in [0.0, 1.0], so the result is in [0.0, 1.0].
/// Returns 0.0 when every pixel is excluded.
pub fn masked_mse(a: &PixelGrid, b: &PixelGrid, mask: &ExclusionMask) -> f64 {
    let (h, w) = (a.height(), a.width());

    let row_sum = |row: usize| -> (f64, usize) {
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for col in 0..w {
            if mask[[row, col]] {
                continue;
            }
            for (ca, cb) in a.channels().iter().zip(b.channels().iter()) {
                let d = (ca[[row, col]] - cb[[row, col]]) as f64;
                sum += d * d;
            }
            count += 1;
        }
        (sum, count)
    };

    let (sum, count) = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h)
            .into_par_iter()
            .map(row_sum)
            .reduce(|| (0.0, 0), |x, y| (x.0 + y.0, x.1 + y.1))
    } else {
        (0..h).map(row_sum).fold((0.0, 0), |x, y| (x.0 + y.0, x.1 + y.1))
    };

    if count == 0 {
        return 0.0;
    }
    sum / (count * COLOR_CHANNEL_COUNT) as f64
}
