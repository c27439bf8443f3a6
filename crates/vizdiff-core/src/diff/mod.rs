pub mod mse;
pub mod pixel;
pub mod score;
pub mod ssim;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::perceptual::PerceptualMetrics;
use crate::error::{DiffError, Result};
use crate::grid::{DifferenceMap, ExclusionMask, PixelGrid};

pub use pixel::{sensitivity_threshold, validate_sensitivity};
pub use score::combine_score;

/// Numeric outcome of a comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    /// Mean squared error on [0,1] intensities.
    pub mse: f64,
    /// Structural similarity of the luminance projections.
    pub ssim: f64,
    /// `changed_pixels / total_pixels * 100`, 0 when nothing is scored.
    pub difference_percentage: f64,
    pub changed_pixels: usize,
    /// Number of non-excluded pixels at the working resolution.
    pub total_pixels: usize,
    /// Supplementary perceptual measures. Not part of the score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perceptual: Option<PerceptualMetrics>,
}

/// Everything the difference engine derives from one image pair.
#[derive(Clone, Debug)]
pub struct DifferenceReport {
    pub metrics: ComparisonMetrics,
    /// Final weighted score in [0, 100].
    pub score: f64,
    /// Difference-map threshold derived from the sensitivity.
    pub threshold: f32,
    /// Continuous per-pixel change intensity (ignores the exclusion mask).
    pub difference_map: DifferenceMap,
    /// Pixels whose difference exceeds `threshold` (ignores the exclusion mask).
    pub changed: Array2<bool>,
}

/// Compute MSE, SSIM and the thresholded pixel difference of two grids of
/// identical size, then combine them into the weighted score.
///
/// Excluded pixels are removed from every metric. The difference map and the
/// changed grid still cover the whole image, so renderings show excluded areas.
pub fn compute_difference(
    a: &PixelGrid,
    b: &PixelGrid,
    mask: &ExclusionMask,
    sensitivity: f32,
) -> Result<DifferenceReport> {
    validate_sensitivity(sensitivity)?;

    let (da, db) = (a.dimensions(), b.dimensions());
    if da != db {
        return Err(DiffError::DimensionMismatch {
            left_w: da.width,
            left_h: da.height,
            right_w: db.width,
            right_h: db.height,
        });
    }
    if mask.dim() != a.red.dim() {
        let (mh, mw) = mask.dim();
        return Err(DiffError::DimensionMismatch {
            left_w: da.width,
            left_h: da.height,
            right_w: mw as u32,
            right_h: mh as u32,
        });
    }

    let threshold = sensitivity_threshold(sensitivity);
    let difference_map = pixel::difference_map(a, b);
    let changed = difference_map.above(threshold);
    let (changed_pixels, total_pixels) = pixel::count_changes(&changed, mask);

    let mse = mse::masked_mse(a, b, mask);
    let ssim = ssim::masked_ssim(&a.luminance(), &b.luminance(), mask);

    let (difference_percentage, score) = if total_pixels == 0 {
        warn!("Every pixel is excluded; reporting a zero difference score");
        (0.0, 0.0)
    } else {
        let pct = changed_pixels as f64 / total_pixels as f64 * 100.0;
        (pct, combine_score(pct, ssim, mse))
    };

    debug!(
        mse,
        ssim,
        difference_percentage,
        changed_pixels,
        total_pixels,
        threshold,
        score,
        "Computed difference metrics"
    );

    Ok(DifferenceReport {
        metrics: ComparisonMetrics {
            mse,
            ssim,
            difference_percentage,
            changed_pixels,
            total_pixels,
            perceptual: None,
        },
        score,
        threshold,
        difference_map,
        changed,
    })
}
