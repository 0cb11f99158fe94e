//! Mountain climber recognizer
//!
//! A rep is an ordered drive: right knee in, then left knee in. A left drive
//! without a prior right drive is ignored.

use tracing::debug;

use repflow_core::{Exercise, Frame, Landmark, PoseLandmark};

use crate::{Feedback, RepOutcome, Recognizer};

/// Knee x minus hip x below this counts as driven in
pub const KNEE_IN_THRESHOLD: f32 = -0.05;

const REQUIRED: &[PoseLandmark] = &[
    PoseLandmark::LeftHip,
    PoseLandmark::RightHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::RightKnee,
];

/// Knees driven so far in the current rep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountainClimberPhase {
    #[default]
    Neither,
    RightIn,
    /// Transient: emitted and reset within the same frame
    BothIn,
}

/// Knee pulled forward of the hip toward the chest
pub fn is_knee_in(knee: &Landmark, hip: &Landmark) -> bool {
    knee.x - hip.x < KNEE_IN_THRESHOLD
}

/// Counts mountain climbers, right knee then left
#[derive(Debug, Clone, Default)]
pub struct MountainClimberRecognizer {
    phase: MountainClimberPhase,
}

impl MountainClimberRecognizer {
    /// Create a new recognizer with neither knee in
    pub fn new() -> Self {
        Self::default()
    }

    pub fn climber_phase(&self) -> MountainClimberPhase {
        self.phase
    }
}

impl Recognizer for MountainClimberRecognizer {
    fn exercise(&self) -> Exercise {
        Exercise::MountainClimbers
    }

    fn required_landmarks(&self) -> &'static [PoseLandmark] {
        REQUIRED
    }

    fn evaluate(&mut self, frame: &Frame) -> RepOutcome {
        let right_in = is_knee_in(
            frame.landmark(PoseLandmark::RightKnee),
            frame.landmark(PoseLandmark::RightHip),
        );
        let left_in = is_knee_in(
            frame.landmark(PoseLandmark::LeftKnee),
            frame.landmark(PoseLandmark::LeftHip),
        );

        if right_in && self.phase == MountainClimberPhase::Neither {
            self.phase = MountainClimberPhase::RightIn;
        }
        if left_in && self.phase == MountainClimberPhase::RightIn {
            self.phase = MountainClimberPhase::BothIn;
        }

        if self.phase == MountainClimberPhase::BothIn {
            debug!("mountain climber completed");
            self.phase = MountainClimberPhase::Neither;
            return RepOutcome::completed(Feedback::KeepGoing);
        }
        RepOutcome::hold(Feedback::KeepGoing)
    }

    fn phase(&self) -> &'static str {
        match self.phase {
            MountainClimberPhase::Neither => "neither",
            MountainClimberPhase::RightIn => "right_in",
            MountainClimberPhase::BothIn => "both_in",
        }
    }

    fn reset(&mut self) {
        self.phase = MountainClimberPhase::Neither;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repflow_core::FrameBuilder;

    const IN: f32 = 0.4;
    const OUT: f32 = 0.6;

    fn knees(left_x: f32, right_x: f32) -> Frame {
        FrameBuilder::new()
            .at(PoseLandmark::LeftHip, 0.5, 0.5)
            .at(PoseLandmark::RightHip, 0.5, 0.52)
            .at(PoseLandmark::LeftKnee, left_x, 0.6)
            .at(PoseLandmark::RightKnee, right_x, 0.62)
            .build()
    }

    #[test]
    fn test_right_then_left_counts() {
        let mut r = MountainClimberRecognizer::new();
        assert_eq!(r.process(&knees(OUT, OUT)).rep_delta(), 0);
        assert_eq!(r.process(&knees(OUT, IN)).rep_delta(), 0);
        assert_eq!(r.climber_phase(), MountainClimberPhase::RightIn);
        assert_eq!(r.process(&knees(IN, OUT)).rep_delta(), 1);
        assert_eq!(r.climber_phase(), MountainClimberPhase::Neither);
    }

    #[test]
    fn test_left_without_right_never_counts() {
        let mut r = MountainClimberRecognizer::new();
        let total: u32 = (0..20)
            .map(|i| {
                let left = if i % 2 == 0 { IN } else { OUT };
                r.process(&knees(left, OUT)).rep_delta()
            })
            .sum();
        assert_eq!(total, 0);
        assert_eq!(r.climber_phase(), MountainClimberPhase::Neither);
    }

    #[test]
    fn test_both_in_same_frame() {
        let mut r = MountainClimberRecognizer::new();
        assert_eq!(r.process(&knees(IN, IN)).rep_delta(), 1);
        assert_eq!(r.process(&knees(IN, IN)).rep_delta(), 1);
    }

    #[test]
    fn test_shallow_drive_ignored() {
        let mut r = MountainClimberRecognizer::new();
        // Forward of the hip, but not past the threshold
        r.process(&knees(OUT, 0.46));
        assert_eq!(r.climber_phase(), MountainClimberPhase::Neither);
    }
}
