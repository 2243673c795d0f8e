//! Estimation results and the per-frame safety report

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Safety tier for a single object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SafetyTier {
    /// Imminent hazard
    Stop,
    /// Close enough to watch
    Warning,
    /// Far away
    Safe,
}

impl SafetyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyTier::Stop => "STOP",
            SafetyTier::Warning => "WARNING",
            SafetyTier::Safe => "SAFE",
        }
    }
}

impl fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse horizontal position in the field of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bearing {
    Left,
    Ahead,
    Right,
}

impl Bearing {
    /// Phrase used in spoken/printed reports
    pub fn phrase(&self) -> &'static str {
        match self {
            Bearing::Left => "to your LEFT",
            Bearing::Ahead => "DIRECTLY AHEAD",
            Bearing::Right => "to your RIGHT",
        }
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Side to step towards to avoid an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepDirection {
    Left,
    Right,
}

impl StepDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepDirection::Left => "LEFT",
            StepDirection::Right => "RIGHT",
        }
    }
}

impl fmt::Display for StepDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimate for one detection.
///
/// Serialized with `step` and `action` present only for STOP hazards.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationResult {
    /// Detector label
    pub label: String,

    /// Estimated distance, rounded to 0.1m
    pub distance_m: f64,

    /// Safety tier
    pub tier: SafetyTier,

    /// Position in the frame
    pub bearing: Bearing,

    /// Avoidance side; only surfaced for STOP
    pub step: StepDirection,
}

impl EstimationResult {
    /// Avoidance side when the object is a STOP hazard
    pub fn recommended_step(&self) -> Option<StepDirection> {
        match self.tier {
            SafetyTier::Stop => Some(self.step),
            _ => None,
        }
    }

    /// Instruction shown for STOP hazards
    pub fn action(&self) -> Option<String> {
        self.recommended_step()
            .map(|step| format!("Step {} immediately!", step))
    }
}

impl Serialize for EstimationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let step = self.recommended_step();
        let len = if step.is_some() { 7 } else { 5 };

        let mut state = serializer.serialize_struct("EstimationResult", len)?;
        state.serialize_field("label", &self.label)?;
        state.serialize_field("distance_m", &self.distance_m)?;
        state.serialize_field("tier", &self.tier)?;
        state.serialize_field("bearing", &self.bearing)?;
        state.serialize_field("position", self.bearing.phrase())?;
        match step {
            Some(step) => {
                state.serialize_field("step", &step)?;
                state.serialize_field("action", &self.action())?;
            }
            None => {
                state.skip_field("step")?;
                state.skip_field("action")?;
            }
        }
        state.end()
    }
}

impl fmt::Display for EstimationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} at {:.1} meters.",
            self.tier, self.label, self.bearing, self.distance_m
        )
    }
}

/// Safety report for one analyzed frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct SafetyReport {
    /// Whether a frame was analyzed at all
    pub analyzed: bool,

    /// Objects the detector returned above the confidence gate
    pub detected: usize,

    /// Estimates, closest first
    pub hazards: Vec<EstimationResult>,
}

impl SafetyReport {
    /// Report for a frame that was analyzed
    pub fn analyzed(detected: usize, hazards: Vec<EstimationResult>) -> Self {
        Self {
            analyzed: true,
            detected,
            hazards,
        }
    }

    /// Analyzed and nothing left to warn about
    pub fn is_clear(&self) -> bool {
        self.analyzed && self.hazards.is_empty()
    }

    /// Closest object, if any
    pub fn closest(&self) -> Option<&EstimationResult> {
        self.hazards.first()
    }

    /// Check if any STOP hazards
    pub fn has_stop(&self) -> bool {
        self.hazards.iter().any(|h| h.tier == SafetyTier::Stop)
    }

    pub fn count_tier(&self, tier: SafetyTier) -> usize {
        self.hazards.iter().filter(|h| h.tier == tier).count()
    }
}
