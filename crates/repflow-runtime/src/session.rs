//! Exercise session - the state owned for one active exercise

use tracing::{debug, trace};

use repflow_core::{Exercise, Frame};
use repflow_motion::{FrameGate, GateDecision, SamplerStats, SamplerThresholds};
use repflow_recognize::{AnyRecognizer, RepOutcome, Recognizer};

use crate::DispatcherConfig;

/// Gate and recognizer for one exercise.
///
/// Created fresh whenever the active exercise changes; nothing survives a
/// switch.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    exercise: Exercise,
    gate: FrameGate,
    recognizer: AnyRecognizer,
    reps: u64,
    frames: u64,
}

impl ExerciseSession {
    /// Create a new session for `exercise`, applying any threshold override
    pub fn new(exercise: Exercise, config: &DispatcherConfig) -> Self {
        let gate = match config.thresholds_for(exercise) {
            Some(thresholds) => FrameGate::with_thresholds(thresholds),
            None => FrameGate::new(exercise),
        };
        ExerciseSession {
            exercise,
            gate,
            recognizer: AnyRecognizer::for_exercise(exercise),
            reps: 0,
            frames: 0,
        }
    }

    /// Gate a frame and, if admitted, run the recognizer.
    ///
    /// Returns `None` when the sampler skipped the frame.
    pub fn feed(&mut self, frame: &Frame, min_visibility: f32) -> Option<RepOutcome> {
        self.frames += 1;
        match self.gate.admit(Some(frame)) {
            GateDecision::Process(score) => {
                let outcome = self.recognizer.process_with(frame, min_visibility);
                trace!(
                    exercise = %self.exercise,
                    ?score,
                    phase = self.recognizer.phase(),
                    "frame analyzed"
                );
                if outcome.is_completed() {
                    self.reps += 1;
                    debug!(
                        exercise = %self.exercise,
                        reps = self.reps,
                        at_ms = frame.timestamp().as_millis(),
                        "rep counted"
                    );
                }
                Some(outcome)
            }
            GateDecision::Skip(score) => {
                trace!(exercise = %self.exercise, ?score, "frame skipped");
                None
            }
            GateDecision::PoseLost => None,
        }
    }

    /// Record a tick without a detection. The recognizer is not consulted.
    pub fn feed_lost(&mut self) {
        self.frames += 1;
        self.gate.admit(None);
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    /// Reps completed since the session was created
    pub fn reps(&self) -> u64 {
        self.reps
    }

    /// Ticks fed, lost ones included
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Recognizer phase label
    pub fn phase(&self) -> &'static str {
        self.recognizer.phase()
    }

    /// Sampler thresholds in force
    pub fn thresholds(&self) -> SamplerThresholds {
        self.gate.sampler().thresholds()
    }

    /// Sampler decision counters
    pub fn sampler_stats(&self) -> &SamplerStats {
        self.gate.sampler().stats()
    }

    pub fn gate(&self) -> &FrameGate {
        &self.gate
    }

    pub fn recognizer(&self) -> &AnyRecognizer {
        &self.recognizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repflow_core::{FrameBuilder, PoseLandmark};
    use repflow_recognize::{Feedback, MIN_JOINT_VISIBILITY};

    #[test]
    fn test_new_session_uses_class_thresholds() {
        let session = ExerciseSession::new(Exercise::Squats, &DispatcherConfig::default());
        assert_eq!(session.thresholds(), SamplerThresholds { high: 0.04, low: 0.02 });
        assert_eq!(session.phase(), "standing");
        assert_eq!(session.reps(), 0);
    }

    #[test]
    fn test_override_thresholds() {
        let thresholds = SamplerThresholds::new(0.2, 0.1).unwrap();
        let config = DispatcherConfig::default().with_thresholds(Exercise::HighKnees, thresholds);
        let session = ExerciseSession::new(Exercise::HighKnees, &config);
        assert_eq!(session.thresholds(), thresholds);
    }

    #[test]
    fn test_first_frame_is_analyzed_then_still_frames_thin_out() {
        let mut session = ExerciseSession::new(Exercise::MountainClimbers, &DispatcherConfig::default());
        let frame = FrameBuilder::new().build();

        let analyzed: Vec<bool> = (0..5)
            .map(|_| session.feed(&frame, MIN_JOINT_VISIBILITY).is_some())
            .collect();
        // First frame is forced; identical frames then fall in the low band
        assert_eq!(analyzed, vec![true, false, false, false, true]);
        assert_eq!(session.frames(), 5);
    }

    #[test]
    fn test_lost_tick_leaves_recognizer_alone() {
        let mut session = ExerciseSession::new(Exercise::Squats, &DispatcherConfig::default());
        let bottom = FrameBuilder::new()
            .at(PoseLandmark::LeftShoulder, 0.47, 0.45)
            .at(PoseLandmark::LeftHip, 0.45, 0.75)
            .at(PoseLandmark::LeftKnee, 0.5, 0.7)
            .at(PoseLandmark::LeftAnkle, 0.5, 0.9)
            .build();

        let outcome = session.feed(&bottom, MIN_JOINT_VISIBILITY).unwrap();
        assert_eq!(outcome.feedback(), Feedback::GoodForm);
        assert_eq!(session.phase(), "squatting");

        session.feed_lost();
        assert_eq!(session.phase(), "squatting");
        assert_eq!(session.sampler_stats().forced, 1);
    }
}
