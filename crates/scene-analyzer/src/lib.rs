//! Scene Analysis
//!
//! Runs one uploaded photo through the walking-safety pipeline:
//! - Decode and resize to the square frame the detector expects
//! - Ask the detector for labelled boxes
//! - Estimate distance and tier for every box, closest first

pub mod analyzer;
pub mod config;
pub mod detector;
pub mod frame;

pub use analyzer::SceneAnalyzer;
pub use config::AnalyzerConfig;
pub use detector::{Detector, ReplayDetector};
pub use frame::PreparedFrame;

use hazard_estimator::EstimatorError;
use thiserror::Error;

/// Scene analysis error types
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels")]
    EmptyFrame,

    #[error("Detector failed: {0}")]
    Detector(String),

    #[error(transparent)]
    Estimator(#[from] EstimatorError),
}
