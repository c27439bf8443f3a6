use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MAX_DIMENSION;

/// How two capped grids of different size are brought to a common resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileMode {
    /// Resample both grids to `min(width) x min(height)`.
    #[default]
    Resample,
    /// Keep the shared top-left `min(width) x min(height)` sub-rectangle.
    Crop,
}

impl fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resample => write!(f, "Resample"),
            Self::Crop => write!(f, "Crop"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Longest allowed side, in pixels; larger inputs are downscaled.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    /// Size reconciliation policy.
    #[serde(default)]
    pub reconcile: ReconcileMode,
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            reconcile: ReconcileMode::default(),
        }
    }
}
