use crate::consts::{
    MSE_SCORE_CAP, MSE_SCORE_SCALE, SCORE_WEIGHT_MSE, SCORE_WEIGHT_PIXEL, SCORE_WEIGHT_SSIM,
};

/// MSE brought into the 0-100 score range: `min(mse * 1000, 100)`.
pub fn normalized_mse(mse: f64) -> f64 {
    (mse * MSE_SCORE_SCALE).min(MSE_SCORE_CAP)
}

/// Weighted difference score in [0, 100] (score model
/// [`SCORE_MODEL_VERSION`](crate::consts::SCORE_MODEL_VERSION)):
///
/// `0.6 * difference_percentage + 0.3 * (1 - ssim) * 100 + 0.1 * normalized_mse`
pub fn combine_score(difference_percentage: f64, ssim: f64, mse: f64) -> f64 {
    let score = difference_percentage * SCORE_WEIGHT_PIXEL
        + (1.0 - ssim) * 100.0 * SCORE_WEIGHT_SSIM
        + normalized_mse(mse) * SCORE_WEIGHT_MSE;
    score.clamp(0.0, 100.0)
}
