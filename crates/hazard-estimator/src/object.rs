//! Detector output consumed by the estimator

use serde::{Deserialize, Serialize};

/// Axis-aligned box corners in frame pixels.
///
/// Serialized as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Vertical extent; non-positive for degenerate boxes
    pub fn pixel_height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Horizontal center
    pub fn center_x(&self) -> f64 {
        (f64::from(self.x1) + f64::from(self.x2)) / 2.0
    }

    /// All four corners are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f32; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// Detected object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label as named by the detector
    pub label: String,

    /// Bounding box in the prepared frame
    pub bbox: BoundingBox,

    /// Detection confidence; dumps may leave it out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Detection {
    pub fn new(label: impl Into<String>, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            label: label.into(),
            bbox,
            confidence: Some(confidence),
        }
    }
}
