use serde::Serialize;

use crate::analysis::DifferenceAnalysis;
use crate::diff::ComparisonMetrics;
use crate::grid::Dimensions;
use crate::visualize::Visualizations;

/// Comparison stage, used for progress reporting and error attribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStage {
    Decoding,
    Preprocessing,
    Masking,
    Scoring,
    Visualizing,
    Done,
}

impl std::fmt::Display for ComparisonStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decoding => write!(f, "Decoding inputs"),
            Self::Preprocessing => write!(f, "Normalizing images"),
            Self::Masking => write!(f, "Building exclusion mask"),
            Self::Scoring => write!(f, "Scoring differences"),
            Self::Visualizing => write!(f, "Rendering visualizations"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// Outcome of one successful comparison. Never partially filled.
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonResult {
    /// Weighted score in [0, 100]; 0 = identical.
    pub difference_score: f64,
    pub metrics: ComparisonMetrics,
    /// Encoded renderings; `None` when none were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualizations: Option<Visualizations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<DifferenceAnalysis>,
    /// Working resolution as `"WxH"`.
    pub dimensions: String,
    pub before_dimensions: Dimensions,
    pub after_dimensions: Dimensions,
    /// Score model the `difference_score` was computed with.
    pub score_version: &'static str,
    /// Wall-clock duration of the whole comparison.
    pub processing_time_ms: f64,
}

/// Thread-safe progress reporting for comparisons.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new comparison stage has started.
    fn begin_stage(&self, _stage: ComparisonStage) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `compare` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
