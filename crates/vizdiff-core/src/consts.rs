/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f32 = 1e-10;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Number of channels in a pixel grid (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Default cap on the longer side of an input image before comparison.
pub const DEFAULT_MAX_DIMENSION: u32 = 2048;

/// Default comparison sensitivity (1 = lenient, 100 = strict).
pub const DEFAULT_SENSITIVITY: f32 = 50.0;

/// Lowest accepted sensitivity.
pub const MIN_SENSITIVITY: f32 = 1.0;

/// Highest accepted sensitivity.
pub const MAX_SENSITIVITY: f32 = 100.0;

/// Largest per-pixel difference value in the difference map.
pub const MAX_PIXEL_DIFF: f32 = 1.0;

/// Dynamic range of intensities fed to SSIM. Grids are always in [0.0, 1.0].
pub const SSIM_DATA_RANGE: f64 = 1.0;

/// Side of the uniform SSIM window (shrunk for images smaller than this).
pub const SSIM_WINDOW_SIZE: usize = 7;

/// SSIM luminance stabilization constant factor.
pub const SSIM_K1: f64 = 0.01;

/// SSIM contrast stabilization constant factor.
pub const SSIM_K2: f64 = 0.03;

/// Version tag of the score model below. Bump whenever a weight or the MSE
/// scaling changes, since stored scores are only comparable within a version.
pub const SCORE_MODEL_VERSION: &str = "1.0";

/// Score weight of the thresholded difference percentage.
pub const SCORE_WEIGHT_PIXEL: f64 = 0.6;

/// Score weight of the inverted SSIM term.
pub const SCORE_WEIGHT_SSIM: f64 = 0.3;

/// Score weight of the normalized MSE term.
pub const SCORE_WEIGHT_MSE: f64 = 0.1;

/// Multiplier bringing MSE (on [0,1] intensities) into the 0-100 score range.
pub const MSE_SCORE_SCALE: f64 = 1000.0;

/// Upper cap of the normalized MSE term.
pub const MSE_SCORE_CAP: f64 = 100.0;

/// Blend factor of the red fill in the overlay visualization.
pub const OVERLAY_ALPHA: f32 = 0.5;

/// Contrast factor applied before edge enhancement in the enhanced diff.
pub const ENHANCE_CONTRAST_FACTOR: f32 = 2.0;

/// Greyscale cut-off of the enhanced diff (30 on the 0-255 scale).
pub const ENHANCE_THRESHOLD: f32 = 30.0 / 255.0;

/// Components at or below this area (pixels) are not reported as regions.
pub const MIN_REGION_AREA: usize = 100;

/// Maximum number of difference regions reported.
pub const MAX_REPORTED_REGIONS: usize = 10;

/// Number of largest regions inspected for change-type classification.
pub const CHANGE_ANALYSIS_REGIONS: usize = 5;

/// Mean-colour distance (0-255 scale) above which a region counts as recoloured.
pub const COLOR_CHANGE_DISTANCE: f64 = 50.0;

/// Mean-brightness delta (0-255 scale) above which a region counts as added/removed.
pub const BRIGHTNESS_CHANGE_DELTA: f64 = 30.0;

/// Number of histogram bins per channel for colour similarity.
pub const COLOR_HISTOGRAM_BINS: usize = 256;

/// Side of the greyscale thumbnail hashed by the perceptual hash.
pub const PHASH_SIZE: usize = 32;

/// Side of the low-frequency DCT block kept by the perceptual hash.
pub const PHASH_BLOCK: usize = 8;

/// Gaussian sigma applied before Sobel edge extraction.
pub const EDGE_BLUR_SIGMA: f32 = 1.0;

/// Sobel magnitude above which a pixel is an edge.
pub const EDGE_MAGNITUDE_THRESHOLD: f32 = 0.5;
