//! Pinhole-camera distance and safety estimation

use tracing::{debug, warn};

use crate::analysis::{Bearing, EstimationResult, SafetyTier, StepDirection};
use crate::config::{CameraGeometry, EstimatorConfig};
use crate::object::Detection;
use crate::reference::ReferenceHeightTable;
use crate::EstimatorError;

/// Outcome of estimating a batch of detections
#[derive(Debug, Clone, Default)]
pub struct EstimateBatch {
    /// Estimates, closest first
    pub results: Vec<EstimationResult>,

    /// Detections that could not be estimated, in input order
    pub rejected: Vec<EstimatorError>,
}

/// Stateless estimator over an immutable height table and camera geometry
#[derive(Debug, Clone)]
pub struct DistanceEstimator {
    geometry: CameraGeometry,
    heights: ReferenceHeightTable,
    stop_distance_m: f64,
    warning_distance_m: f64,
    ground_bias_factor: f64,
}

impl DistanceEstimator {
    /// Build the estimator, deriving geometry and the height table once
    pub fn new(config: &EstimatorConfig) -> Result<Self, EstimatorError> {
        let geometry = CameraGeometry::from_config(config)?;

        if !(config.default_height_m > 0.0) {
            return Err(EstimatorError::InvalidConfig(format!(
                "default_height_m {} must be positive",
                config.default_height_m
            )));
        }
        if let Some((label, h)) = config.reference_heights.iter().find(|(_, h)| !(**h > 0.0)) {
            return Err(EstimatorError::InvalidConfig(format!(
                "reference height for '{}' is {}, must be positive",
                label, h
            )));
        }
        if !(config.stop_distance_m <= config.warning_distance_m) {
            return Err(EstimatorError::InvalidConfig(format!(
                "stop_distance_m {} exceeds warning_distance_m {}",
                config.stop_distance_m, config.warning_distance_m
            )));
        }

        let heights = ReferenceHeightTable::builtin()
            .with_default_height(config.default_height_m)
            .with_overrides(
                config
                    .reference_heights
                    .iter()
                    .map(|(label, h)| (label.clone(), *h)),
            );

        debug!(
            focal_px = geometry.focal_px(),
            labels = heights.len(),
            "Distance estimator ready"
        );

        Ok(Self {
            geometry,
            heights,
            stop_distance_m: config.stop_distance_m,
            warning_distance_m: config.warning_distance_m,
            ground_bias_factor: config.ground_bias_factor,
        })
    }

    pub fn geometry(&self) -> &CameraGeometry {
        &self.geometry
    }

    pub fn heights(&self) -> &ReferenceHeightTable {
        &self.heights
    }

    /// Estimate distance, bearing, tier and step side for one detection
    pub fn estimate(&self, detection: &Detection) -> Result<EstimationResult, EstimatorError> {
        if detection.label.is_empty() {
            return Err(EstimatorError::EmptyLabel);
        }

        let bbox = &detection.bbox;
        let pixel_height = bbox.pixel_height();
        if !bbox.is_finite() || !(pixel_height > 0.0) {
            return Err(EstimatorError::InvalidGeometry {
                label: detection.label.clone(),
                pixel_height,
            });
        }

        let real_height = self.heights.height_for(&detection.label);
        let mut distance = real_height * self.geometry.focal_px() / f64::from(pixel_height);

        // Boxes reaching the bottom band are usually near-field ground objects
        if f64::from(bbox.y2) > self.geometry.ground_line() {
            distance *= self.ground_bias_factor;
        }

        let center_x = bbox.center_x();

        Ok(EstimationResult {
            label: detection.label.clone(),
            distance_m: round_tenths(distance),
            tier: self.tier_for(distance),
            bearing: self.bearing_for(center_x),
            step: self.step_for(center_x),
        })
    }

    /// Estimate every detection, dropping invalid ones, closest first.
    ///
    /// A malformed box never fails the batch; it lands in `rejected`.
    pub fn estimate_all<'a, I>(&self, detections: I) -> EstimateBatch
    where
        I: IntoIterator<Item = &'a Detection>,
    {
        let mut batch = EstimateBatch::default();
        for detection in detections {
            match self.estimate(detection) {
                Ok(result) => batch.results.push(result),
                Err(e) => {
                    warn!("Dropping detection: {}", e);
                    batch.rejected.push(e);
                }
            }
        }

        sort_closest_first(&mut batch.results);
        batch
    }

    fn tier_for(&self, distance: f64) -> SafetyTier {
        if distance < self.stop_distance_m {
            SafetyTier::Stop
        } else if distance <= self.warning_distance_m {
            SafetyTier::Warning
        } else {
            SafetyTier::Safe
        }
    }

    fn bearing_for(&self, center_x: f64) -> Bearing {
        if center_x < self.geometry.left_edge() {
            Bearing::Left
        } else if center_x > self.geometry.right_edge() {
            Bearing::Right
        } else {
            Bearing::Ahead
        }
    }

    // Uses the frame midline, not the bearing thirds
    fn step_for(&self, center_x: f64) -> StepDirection {
        if center_x < self.geometry.midline() {
            StepDirection::Right
        } else {
            StepDirection::Left
        }
    }
}

/// Stable ascending sort by rounded distance; equal distances keep their order
pub fn sort_closest_first(results: &mut [EstimationResult]) {
    results.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
}

// Half away from zero; differs from round-half-even only on exact .x5 ties
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::BoundingBox;

    fn estimator() -> DistanceEstimator {
        DistanceEstimator::new(&EstimatorConfig::default()).unwrap()
    }

    fn detection(label: &str, x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
        Detection::new(label, BoundingBox::new(x1, y1, x2, y2), 0.9)
    }

    /// Box of `height` px whose horizontal center sits at `cx`
    fn centered(label: &str, cx: f32, height: f32) -> Detection {
        detection(label, cx - 10.0, 0.0, cx + 10.0, height)
    }

    #[test]
    fn test_person_ahead_warning() {
        let result = estimator()
            .estimate(&detection("person", 270.0, 0.0, 370.0, 400.0))
            .unwrap();
        assert_eq!(result.distance_m, 2.4);
        assert_eq!(result.tier, SafetyTier::Warning);
        assert_eq!(result.bearing, Bearing::Ahead);
        assert_eq!(result.step, StepDirection::Left);
        assert_eq!(result.recommended_step(), None);
    }

    #[test]
    fn test_ground_bias_applied_below_ground_line() {
        let result = estimator()
            .estimate(&detection("person", 270.0, 0.0, 370.0, 600.0))
            .unwrap();
        // 1.70 * 554.26 / 600 * 0.75 = 1.18
        assert_eq!(result.distance_m, 1.2);
        assert_eq!(result.tier, SafetyTier::Stop);
        assert_eq!(result.recommended_step(), Some(StepDirection::Left));
    }

    #[test]
    fn test_ground_line_is_strict() {
        let est = estimator();
        // y2 == 576 is not past the line: 1.70 * 554.26 / 576 = 1.64
        let at_line = est.estimate(&detection("person", 270.0, 0.0, 370.0, 576.0)).unwrap();
        assert_eq!(at_line.distance_m, 1.6);
        assert_eq!(at_line.tier, SafetyTier::Warning);
    }

    #[test]
    fn test_unknown_label_uses_default_height() {
        let est = estimator();
        let unknown = est.estimate(&centered("giraffe", 320.0, 100.0)).unwrap();
        let explicit = DistanceEstimator::new(&EstimatorConfig {
            reference_heights: [("giraffe".to_string(), 0.6)].into_iter().collect(),
            ..Default::default()
        })
        .unwrap()
        .estimate(&centered("giraffe", 320.0, 100.0))
        .unwrap();
        // 0.6 * 554.26 / 100 = 3.33
        assert_eq!(unknown.distance_m, 3.3);
        assert_eq!(unknown.distance_m, explicit.distance_m);
    }

    #[test]
    fn test_bearing_boundaries() {
        let est = estimator();
        let at = |cx| est.estimate(&centered("chair", cx, 200.0)).unwrap().bearing;
        assert_eq!(at(212.9), Bearing::Left);
        assert_eq!(at(213.0), Bearing::Ahead);
        assert_eq!(at(427.0), Bearing::Ahead);
        assert_eq!(at(427.1), Bearing::Right);
    }

    #[test]
    fn test_step_direction_uses_midline() {
        let est = estimator();
        let at = |cx| est.estimate(&centered("chair", cx, 200.0)).unwrap().step;
        assert_eq!(at(319.9), StepDirection::Right);
        assert_eq!(at(320.0), StepDirection::Left);
        // Ahead but left of the midline still steps right
        assert_eq!(est.estimate(&centered("chair", 250.0, 200.0)).unwrap().bearing, Bearing::Ahead);
        assert_eq!(at(250.0), StepDirection::Right);
    }

    #[test]
    fn test_tier_boundaries() {
        let est = estimator();
        // Small objects keep the boxes above the ground line
        let focal = est.geometry().focal_px();
        let height_for = |d: f64| (0.25 * focal / d) as f32;
        let tier = |d: f64| est.estimate(&centered("cat", 320.0, height_for(d))).unwrap().tier;
        assert_eq!(tier(1.25), SafetyTier::Stop);
        assert_eq!(tier(1.35), SafetyTier::Warning);
        assert_eq!(tier(3.9), SafetyTier::Warning);
        assert_eq!(tier(4.2), SafetyTier::Safe);
    }

    #[test]
    fn test_zero_height_rejected() {
        let err = estimator()
            .estimate(&detection("person", 0.0, 100.0, 50.0, 100.0))
            .unwrap_err();
        assert_eq!(
            err,
            EstimatorError::InvalidGeometry {
                label: "person".into(),
                pixel_height: 0.0
            }
        );
    }

    #[test]
    fn test_inverted_and_nan_boxes_rejected() {
        let est = estimator();
        assert!(matches!(
            est.estimate(&detection("person", 0.0, 300.0, 50.0, 100.0)),
            Err(EstimatorError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            est.estimate(&detection("person", f32::NAN, 0.0, 50.0, 100.0)),
            Err(EstimatorError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_empty_label_rejected() {
        let err = estimator().estimate(&centered("", 320.0, 100.0)).unwrap_err();
        assert_eq!(err, EstimatorError::EmptyLabel);
    }

    #[test]
    fn test_estimate_all_sorts_and_drops_invalid() {
        let detections = vec![
            centered("tree", 100.0, 100.0),
            detection("person", 0.0, 50.0, 10.0, 50.0),
            centered("cat", 500.0, 100.0),
            centered("person", 320.0, 400.0),
        ];
        let batch = estimator().estimate_all(&detections);
        let labels: Vec<&str> = batch.results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["cat", "person", "tree"]);
        assert_eq!(batch.rejected.len(), 1);
    }

    #[test]
    fn test_estimate_all_keeps_order_of_ties() {
        let detections = vec![
            centered("chair", 100.0, 200.0),
            centered("chair", 500.0, 200.0),
            centered("chair", 320.0, 200.0),
        ];
        let results = estimator().estimate_all(&detections).results;
        let bearings: Vec<Bearing> = results.iter().map(|r| r.bearing).collect();
        assert_eq!(bearings, vec![Bearing::Left, Bearing::Right, Bearing::Ahead]);
    }

    #[test]
    fn test_estimate_all_empty() {
        let batch = estimator().estimate_all(&Vec::<Detection>::new());
        assert!(batch.results.is_empty());
        assert!(batch.rejected.is_empty());
    }

    #[test]
    fn test_estimate_all_reports_rejection_kinds() {
        let detections = vec![
            centered("", 320.0, 100.0),
            detection("chair", 0.0, 100.0, 50.0, 100.0),
            centered("chair", 320.0, 100.0),
        ];
        let batch = estimator().estimate_all(&detections);
        assert_eq!(batch.results.len(), 1);
        let kinds: Vec<&str> = batch.rejected.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["empty_label", "invalid_geometry"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_height = EstimatorConfig {
            reference_heights: [("person".to_string(), 0.0)].into_iter().collect(),
            ..Default::default()
        };
        assert!(DistanceEstimator::new(&bad_height).is_err());

        let bad_thresholds = EstimatorConfig {
            stop_distance_m: 5.0,
            warning_distance_m: 4.0,
            ..Default::default()
        };
        assert!(DistanceEstimator::new(&bad_thresholds).is_err());
    }
}
