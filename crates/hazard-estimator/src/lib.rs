//! Hazard Estimation
//!
//! Turns object detections from a 640x640 frame into walking-safety hints:
//! - Pinhole-camera distance estimate from an assumed real-world height
//! - Coarse bearing (left / ahead / right)
//! - Safety tier (STOP / WARNING / SAFE) and the side to step towards

pub mod analysis;
pub mod config;
pub mod estimator;
pub mod object;
pub mod reference;

pub use analysis::{Bearing, EstimationResult, SafetyReport, SafetyTier, StepDirection};
pub use config::{CameraGeometry, EstimatorConfig};
pub use estimator::{sort_closest_first, DistanceEstimator, EstimateBatch};
pub use object::{BoundingBox, Detection};
pub use reference::{ReferenceHeightTable, DEFAULT_HEIGHT_M};

use thiserror::Error;

/// Estimator error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    #[error("Invalid geometry for '{label}': pixel height {pixel_height} must be positive")]
    InvalidGeometry { label: String, pixel_height: f32 },

    #[error("Detection has an empty label")]
    EmptyLabel,

    #[error("Invalid estimator config: {0}")]
    InvalidConfig(String),
}

impl EstimatorError {
    /// Short machine-readable name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            EstimatorError::InvalidGeometry { .. } => "invalid_geometry",
            EstimatorError::EmptyLabel => "empty_label",
            EstimatorError::InvalidConfig(_) => "invalid_config",
        }
    }
}
