//! Object detector seam

use std::io::Read;

use hazard_estimator::Detection;
use tracing::debug;

use crate::frame::PreparedFrame;
use crate::AnalyzerError;

/// Source of labelled boxes for a prepared frame.
///
/// Model loading and inference live behind this trait; boxes must be in the
/// prepared frame's pixel space.
pub trait Detector {
    /// Detect objects in frame
    fn detect(&self, frame: &PreparedFrame) -> Result<Vec<Detection>, AnalyzerError>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn detect(&self, frame: &PreparedFrame) -> Result<Vec<Detection>, AnalyzerError> {
        (**self).detect(frame)
    }
}

/// Returns a fixed set of detections for every frame, e.g. a dump recorded
/// from a model run
#[derive(Debug, Clone, Default)]
pub struct ReplayDetector {
    detections: Vec<Detection>,
}

impl ReplayDetector {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// Read a JSON array of detections
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AnalyzerError> {
        let detections: Vec<Detection> = serde_json::from_reader(reader)
            .map_err(|e| AnalyzerError::Detector(format!("invalid detection dump: {}", e)))?;
        debug!("Loaded {} recorded detections", detections.len());
        Ok(Self::new(detections))
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }
}

impl Detector for ReplayDetector {
    fn detect(&self, _frame: &PreparedFrame) -> Result<Vec<Detection>, AnalyzerError> {
        Ok(self.detections.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader() {
        let json = r#"[
            { "label": "person", "bbox": [270, 0, 370, 400], "confidence": 0.91 },
            { "label": "chair", "bbox": [10, 300, 90, 420], "confidence": 0.4 }
        ]"#;
        let detector = ReplayDetector::from_reader(json.as_bytes()).unwrap();
        assert_eq!(detector.detections().len(), 2);
        assert_eq!(detector.detections()[1].label, "chair");
    }

    #[test]
    fn test_from_reader_rejects_garbage() {
        let err = ReplayDetector::from_reader("{ not json".as_bytes()).unwrap_err();
        assert!(matches!(err, AnalyzerError::Detector(_)));
    }
}
