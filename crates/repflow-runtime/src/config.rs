//! Dispatcher configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use repflow_core::{Exercise, PoseLandmark, RepflowError, RepflowResult};
use repflow_motion::SamplerThresholds;
use repflow_recognize::MIN_JOINT_VISIBILITY;

/// Landmarks averaged into the caller-facing confidence:
/// nose, shoulders, elbows, wrists, hips, knees.
pub const DEFAULT_CONFIDENCE_LANDMARKS: [PoseLandmark; 11] = [
    PoseLandmark::Nose,
    PoseLandmark::LeftShoulder,
    PoseLandmark::RightShoulder,
    PoseLandmark::LeftElbow,
    PoseLandmark::RightElbow,
    PoseLandmark::LeftWrist,
    PoseLandmark::RightWrist,
    PoseLandmark::LeftHip,
    PoseLandmark::RightHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::RightKnee,
];

/// Session dispatcher configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Landmarks whose mean visibility is reported as confidence
    pub confidence_landmarks: Vec<PoseLandmark>,
    /// Joints below this visibility make a recognizer skip the frame
    pub min_joint_visibility: f32,
    /// Sampler thresholds replacing the intensity-class table
    pub threshold_overrides: HashMap<Exercise, SamplerThresholds>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            confidence_landmarks: DEFAULT_CONFIDENCE_LANDMARKS.to_vec(),
            min_joint_visibility: MIN_JOINT_VISIBILITY,
            threshold_overrides: HashMap::new(),
        }
    }
}

impl DispatcherConfig {
    /// Replace the landmarks averaged into the confidence value
    pub fn with_confidence_landmarks(mut self, landmarks: Vec<PoseLandmark>) -> Self {
        self.confidence_landmarks = landmarks;
        self
    }

    /// Set the visibility below which a joint counts as missing
    pub fn with_min_joint_visibility(mut self, min_visibility: f32) -> Self {
        self.min_joint_visibility = min_visibility;
        self
    }

    /// Pin sampler thresholds for one exercise
    pub fn with_thresholds(mut self, exercise: Exercise, thresholds: SamplerThresholds) -> Self {
        self.threshold_overrides.insert(exercise, thresholds);
        self
    }

    /// Override for `exercise`, if any
    pub fn thresholds_for(&self, exercise: Exercise) -> Option<SamplerThresholds> {
        self.threshold_overrides.get(&exercise).copied()
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> RepflowResult<Self> {
        let config: DispatcherConfig =
            serde_json::from_str(json).map_err(|e| RepflowError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_string(&self) -> RepflowResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RepflowError::Config(e.to_string()))
    }

    /// Check the visibility floor and every threshold override
    pub fn validate(&self) -> RepflowResult<()> {
        if !(0.0..=1.0).contains(&self.min_joint_visibility) {
            return Err(RepflowError::Config(format!(
                "min_joint_visibility {} outside [0, 1]",
                self.min_joint_visibility
            )));
        }
        for thresholds in self.threshold_overrides.values() {
            SamplerThresholds::new(thresholds.high, thresholds.low)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_config() {
        let config = DispatcherConfig::default();
        let indices: Vec<usize> = config.confidence_landmarks.iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![0, 11, 12, 13, 14, 15, 16, 23, 24, 25, 26]);
        assert_eq!(config.min_joint_visibility, MIN_JOINT_VISIBILITY);
        assert!(config.threshold_overrides.is_empty());
    }

    #[test]
    fn test_builders() {
        let thresholds = SamplerThresholds::new(0.08, 0.04).unwrap();
        let config = DispatcherConfig::default()
            .with_confidence_landmarks(vec![PoseLandmark::Nose])
            .with_min_joint_visibility(0.5)
            .with_thresholds(Exercise::Squats, thresholds);

        assert_eq!(config.confidence_landmarks, vec![PoseLandmark::Nose]);
        assert_eq!(config.min_joint_visibility, 0.5);
        assert_eq!(config.thresholds_for(Exercise::Squats), Some(thresholds));
        assert_eq!(config.thresholds_for(Exercise::Burpees), None);
    }

    #[test]
    fn test_from_json_partial() {
        let config = DispatcherConfig::from_json_str(
            r#"{
                "min_joint_visibility": 0.3,
                "threshold_overrides": { "high_knees": { "high": 0.1, "low": 0.05 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.min_joint_visibility, 0.3);
        assert_eq!(config.confidence_landmarks.len(), 11);
        let thresholds = config.thresholds_for(Exercise::HighKnees).unwrap();
        assert_eq!((thresholds.high, thresholds.low), (0.1, 0.05));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = DispatcherConfig::default()
            .with_thresholds(Exercise::Burpees, SamplerThresholds::new(0.07, 0.02).unwrap());
        let json = config.to_json_string().unwrap();
        assert_eq!(DispatcherConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            DispatcherConfig::from_json_str("{ not json"),
            Err(RepflowError::Config(_))
        ));
        assert!(matches!(
            DispatcherConfig::from_json_str(r#"{ "min_joint_visibility": 2.0 }"#),
            Err(RepflowError::Config(_))
        ));
        assert!(matches!(
            DispatcherConfig::from_json_str(
                r#"{ "threshold_overrides": { "squats": { "high": 0.01, "low": 0.05 } } }"#
            ),
            Err(RepflowError::InvalidThresholds { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_visibility_floor_validated(min_vis in -1.0f32..2.0) {
            let config = DispatcherConfig::default().with_min_joint_visibility(min_vis);
            prop_assert_eq!(config.validate().is_ok(), (0.0..=1.0).contains(&min_vis));
        }
    }
}
