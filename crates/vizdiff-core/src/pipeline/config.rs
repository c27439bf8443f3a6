use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOptions;
use crate::consts::DEFAULT_SENSITIVITY;
use crate::diff::validate_sensitivity;
use crate::error::{DiffError, Result};
use crate::preprocess::PreprocessConfig;
use crate::visualize::VisualizationOptions;

/// Settings of one comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// 1 = only near-total changes count, 100 = any change counts.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    #[serde(default)]
    pub visualizations: VisualizationOptions,
    #[serde(default)]
    pub analysis: AnalysisOptions,
}

fn default_sensitivity() -> f32 {
    DEFAULT_SENSITIVITY
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            preprocess: PreprocessConfig::default(),
            visualizations: VisualizationOptions::default(),
            analysis: AnalysisOptions::default(),
        }
    }
}

impl CompareConfig {
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Reject settings no comparison can run with.
    pub fn validate(&self) -> Result<()> {
        validate_sensitivity(self.sensitivity)?;
        if self.preprocess.max_dimension == 0 {
            return Err(DiffError::InvalidParameter(
                "max_dimension must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
