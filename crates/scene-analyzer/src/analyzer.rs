//! Per-frame safety analysis

use hazard_estimator::{Detection, DistanceEstimator, SafetyReport};
use metrics::counter;
use tracing::{debug, info, warn};

use crate::config::AnalyzerConfig;
use crate::detector::Detector;
use crate::frame::PreparedFrame;
use crate::AnalyzerError;

/// Scene analyzer: frame preparation, detection and estimation
pub struct SceneAnalyzer<D: Detector> {
    config: AnalyzerConfig,
    estimator: DistanceEstimator,
    detector: D,
}

impl<D: Detector> SceneAnalyzer<D> {
    /// Create new scene analyzer
    pub fn new(config: AnalyzerConfig, detector: D) -> Result<Self, AnalyzerError> {
        let estimator = DistanceEstimator::new(&config.estimator)?;
        info!(
            "Scene analyzer ready: frame={}px, focal={:.2}px, min_confidence={}",
            estimator.geometry().image_size(),
            estimator.geometry().focal_px(),
            config.min_confidence
        );
        Ok(Self {
            config,
            estimator,
            detector,
        })
    }

    pub fn estimator(&self) -> &DistanceEstimator {
        &self.estimator
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Decode an uploaded image and analyze it
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<SafetyReport, AnalyzerError> {
        let frame = PreparedFrame::from_bytes(bytes, self.estimator.geometry().image_size())?;
        self.analyze_frame(&frame)
    }

    /// Run the detector on a prepared frame and analyze its output
    pub fn analyze_frame(&self, frame: &PreparedFrame) -> Result<SafetyReport, AnalyzerError> {
        let expected = self.estimator.geometry().image_size();
        if frame.size() != expected {
            warn!(
                "Frame is {}px but thresholds assume {}px",
                frame.size(),
                expected
            );
        }

        let detections = self.detector.detect(frame)?;
        Ok(self.analyze_detections(&detections))
    }

    /// Estimate every usable detection; malformed boxes are dropped, not fatal
    pub fn analyze_detections(&self, detections: &[Detection]) -> SafetyReport {
        counter!("vision_guard_frames_total").increment(1);

        let kept: Vec<&Detection> = detections
            .iter()
            .filter(|d| self.passes_confidence(d))
            .collect();
        counter!("vision_guard_detections_total").increment(kept.len() as u64);

        info!(
            "--- GLOBAL SAFETY REPORT (Detected {} objects) ---",
            kept.len()
        );

        let batch = self.estimator.estimate_all(kept.iter().copied());
        for rejected in &batch.rejected {
            counter!("vision_guard_rejected_detections_total", "reason" => rejected.kind())
                .increment(1);
        }
        for result in &batch.results {
            info!("{}", result);
            counter!("vision_guard_hazards_total", "tier" => result.tier.as_str()).increment(1);
        }

        if batch.results.is_empty() {
            info!("No objects detected. The path is clear.");
        }

        SafetyReport::analyzed(kept.len(), batch.results)
    }

    // Scores must be strictly above the gate; unscored detections are kept
    fn passes_confidence(&self, detection: &Detection) -> bool {
        match detection.confidence {
            Some(confidence) if confidence <= self.config.min_confidence => {
                debug!(
                    "Skipping {} (conf={:.2} <= {:.2})",
                    detection.label, confidence, self.config.min_confidence
                );
                false
            }
            _ => true,
        }
    }
}
