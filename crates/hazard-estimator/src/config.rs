//! Estimator configuration and derived camera geometry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::reference::DEFAULT_HEIGHT_M;
use crate::EstimatorError;

/// Estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Side of the square frame the detector sees (pixels)
    pub image_size: u32,

    /// Assumed vertical field of view (degrees)
    pub vertical_fov_deg: f64,

    /// Height used for labels missing from the reference table (meters)
    pub default_height_m: f64,

    /// Below this distance an object is a STOP hazard (meters)
    pub stop_distance_m: f64,

    /// Up to and including this distance an object is a WARNING (meters)
    pub warning_distance_m: f64,

    /// Distance multiplier for boxes reaching into the bottom tenth of the frame
    pub ground_bias_factor: f64,

    /// Extra or replacement entries for the built-in height table
    pub reference_heights: HashMap<String, f64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            image_size: 640,
            vertical_fov_deg: 60.0,
            default_height_m: DEFAULT_HEIGHT_M,
            stop_distance_m: 1.3,
            warning_distance_m: 4.0,
            ground_bias_factor: 0.75,
            reference_heights: HashMap::new(),
        }
    }
}

/// Pixel-domain constants derived once from [`EstimatorConfig`].
///
/// All thresholds are fixed against the frame side, so for the default
/// 640px frame they are 213 / 320 / 427 for the horizontal splits and 576
/// for the ground line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraGeometry {
    image_size: u32,
    focal_px: f64,
    left_edge: f64,
    right_edge: f64,
    midline: f64,
    ground_line: f64,
}

impl CameraGeometry {
    /// Derive geometry for a square frame of `image_size` pixels and the given vertical FOV
    pub fn new(image_size: u32, vertical_fov_deg: f64) -> Result<Self, EstimatorError> {
        if image_size == 0 {
            return Err(EstimatorError::InvalidConfig(
                "image_size must be greater than zero".into(),
            ));
        }
        if !(vertical_fov_deg > 0.0 && vertical_fov_deg < 180.0) {
            return Err(EstimatorError::InvalidConfig(format!(
                "vertical_fov_deg {} is outside (0, 180)",
                vertical_fov_deg
            )));
        }

        let half_fov = (vertical_fov_deg / 2.0).to_radians();
        let focal_px = f64::from(image_size) / 2.0 / half_fov.tan();
        let left = image_size / 3;

        Ok(Self {
            image_size,
            focal_px,
            left_edge: f64::from(left),
            right_edge: f64::from(image_size - left),
            midline: f64::from(image_size / 2),
            ground_line: f64::from(image_size * 9 / 10),
        })
    }

    /// Geometry for the configured frame
    pub fn from_config(config: &EstimatorConfig) -> Result<Self, EstimatorError> {
        Self::new(config.image_size, config.vertical_fov_deg)
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Focal length in pixels
    pub fn focal_px(&self) -> f64 {
        self.focal_px
    }

    /// Box centers strictly left of this are LEFT
    pub fn left_edge(&self) -> f64 {
        self.left_edge
    }

    /// Box centers strictly right of this are RIGHT
    pub fn right_edge(&self) -> f64 {
        self.right_edge
    }

    /// Splits the frame for the step-avoidance hint
    pub fn midline(&self) -> f64 {
        self.midline
    }

    /// Boxes whose bottom edge lies below this get the ground bias
    pub fn ground_line(&self) -> f64 {
        self.ground_line
    }
}
