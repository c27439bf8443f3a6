use ndarray::{Array2, Zip};
use rayon::prelude::*;

use crate::consts::{MAX_PIXEL_DIFF, MAX_SENSITIVITY, MIN_SENSITIVITY, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{DiffError, Result};
use crate::grid::{DifferenceMap, ExclusionMask, PixelGrid};

/// Reject sensitivities outside [1, 100] (and NaN).
pub fn validate_sensitivity(sensitivity: f32) -> Result<()> {
    if !(MIN_SENSITIVITY..=MAX_SENSITIVITY).contains(&sensitivity) {
        return Err(DiffError::InvalidParameter(format!(
            "sensitivity must be within [{MIN_SENSITIVITY}, {MAX_SENSITIVITY}], got {sensitivity}"
        )));
    }
    Ok(())
}

/// Difference-map threshold for a sensitivity in [1, 100].
///
/// `threshold = MAX_PIXEL_DIFF * (1 - sensitivity / 100)`: sensitivity 1 gives
/// 0.99 (only near-total changes count), 100 gives 0.0 (any change counts).
/// Non-increasing in `sensitivity`.
pub fn sensitivity_threshold(sensitivity: f32) -> f32 {
    MAX_PIXEL_DIFF * (1.0 - sensitivity / 100.0)
}

/// Per-channel absolute difference `|a - b|`.
pub fn absolute_difference(a: &PixelGrid, b: &PixelGrid) -> PixelGrid {
    PixelGrid::from_channels(
        (&a.red - &b.red).mapv_into(f32::abs),
        (&a.green - &b.green).mapv_into(f32::abs),
        (&a.blue - &b.blue).mapv_into(f32::abs),
    )
}

/// Per-pixel change intensity: the largest channel difference.
pub fn difference_map(a: &PixelGrid, b: &PixelGrid) -> DifferenceMap {
    let abs = absolute_difference(a, b);
    let mut data = Array2::<f32>::zeros(abs.red.dim());
    let max3 = |d: &mut f32, &r: &f32, &g: &f32, &b: &f32| *d = r.max(g).max(b);

    let zip = Zip::from(&mut data).and(&abs.red).and(&abs.green).and(&abs.blue);
    if abs.red.len() >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(max3);
    } else {
        zip.for_each(max3);
    }

    DifferenceMap { data }
}

/// Count changed pixels among non-excluded ones.
///
/// Returns `(changed_pixels, total_pixels)`; excluded pixels count toward
/// neither.
pub fn count_changes(changed: &Array2<bool>, mask: &ExclusionMask) -> (usize, usize) {
    let (h, _) = changed.dim();
    let count_row = |row: usize| -> (usize, usize) {
        let mut changed_count = 0usize;
        let mut total = 0usize;
        for (&c, &excluded) in changed.row(row).iter().zip(mask.row(row).iter()) {
            if excluded {
                continue;
            }
            total += 1;
            if c {
                changed_count += 1;
            }
        }
        (changed_count, total)
    };

    if changed.len() >= PARALLEL_PIXEL_THRESHOLD {
        (0..h)
            .into_par_iter()
            .map(count_row)
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
    } else {
        (0..h)
            .map(count_row)
            .fold((0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
    }
}
