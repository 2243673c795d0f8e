//! Scene analyzer configuration

use hazard_estimator::EstimatorConfig;
use serde::{Deserialize, Serialize};

/// Scene analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Detections below this confidence are ignored
    pub min_confidence: f32,

    /// Distance estimation settings
    pub estimator: EstimatorConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.20,
            estimator: EstimatorConfig::default(),
        }
    }
}
