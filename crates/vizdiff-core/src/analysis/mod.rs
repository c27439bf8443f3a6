pub mod components;
pub mod perceptual;
pub mod regions;

use serde::{Deserialize, Serialize};

pub use perceptual::{perceptual_similarity, PerceptualMetrics};
pub use regions::{analyze_differences, BoundingBox, ChangeTypes, DifferenceAnalysis, DifferenceRegion};

/// Optional analyses run after scoring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Locate and classify changed regions.
    #[serde(default = "default_true")]
    pub regions: bool,
    /// Compute the perceptual similarity measures.
    #[serde(default = "default_true")]
    pub perceptual: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            regions: true,
            perceptual: true,
        }
    }
}
