//! Jumping jack recognizer
//!
//! Thresholds scale with the subject's own limb lengths (left arm, left leg)
//! so distance to the camera does not matter.

use tracing::debug;

use repflow_core::geometry::{distance, horizontal_gap, is_above};
use repflow_core::{Exercise, Frame, PoseLandmark};

use crate::{Feedback, RepOutcome, Recognizer};

/// Wrists must rise this fraction of arm length above the shoulders
pub const ARMS_UP_RATIO: f32 = 0.5;

/// Open stance: feet apart between these fractions of leg length
pub const FEET_APART_MIN_RATIO: f32 = 0.4;
/// Upper bound on foot spread, as a fraction of leg length
pub const FEET_APART_MAX_RATIO: f32 = 0.6;

/// Closed stance: feet within this horizontal distance
pub const FEET_TOGETHER_MAX: f32 = 0.1;

/// Wrist this close to shoulder height reads as a half-raised arm
pub const ARM_EXTENSION_MIN: f32 = 0.15;

const REQUIRED: &[PoseLandmark] = &[
    PoseLandmark::LeftShoulder,
    PoseLandmark::RightShoulder,
    PoseLandmark::LeftWrist,
    PoseLandmark::RightWrist,
    PoseLandmark::LeftHip,
    PoseLandmark::LeftFootIndex,
    PoseLandmark::RightFootIndex,
];

/// Arms and feet position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpingJackPhase {
    #[default]
    Closed,
    Open,
}

/// Counts jumping jacks on the open-to-closed transition
#[derive(Debug, Clone, Default)]
pub struct JumpingJackRecognizer {
    phase: JumpingJackPhase,
}

impl JumpingJackRecognizer {
    /// Create a new recognizer in the closed phase
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jack_phase(&self) -> JumpingJackPhase {
        self.phase
    }
}

impl Recognizer for JumpingJackRecognizer {
    fn exercise(&self) -> Exercise {
        Exercise::JumpingJacks
    }

    fn required_landmarks(&self) -> &'static [PoseLandmark] {
        REQUIRED
    }

    fn evaluate(&mut self, frame: &Frame) -> RepOutcome {
        let shoulder_l = frame.landmark(PoseLandmark::LeftShoulder);
        let shoulder_r = frame.landmark(PoseLandmark::RightShoulder);
        let wrist_l = frame.landmark(PoseLandmark::LeftWrist);
        let wrist_r = frame.landmark(PoseLandmark::RightWrist);
        let hip_l = frame.landmark(PoseLandmark::LeftHip);
        let toe_l = frame.landmark(PoseLandmark::LeftFootIndex);
        let toe_r = frame.landmark(PoseLandmark::RightFootIndex);

        let arm_length = distance(shoulder_l, wrist_l);
        let leg_length = distance(hip_l, toe_l);
        let feet_gap = horizontal_gap(toe_l, toe_r);

        let arms_down = is_above(shoulder_l, wrist_l) && is_above(shoulder_r, wrist_r);
        let feet_together = feet_gap < FEET_TOGETHER_MAX;

        let raise = ARMS_UP_RATIO * arm_length;
        let arms_up = wrist_l.y < shoulder_l.y - raise && wrist_r.y < shoulder_r.y - raise;
        let feet_apart = FEET_APART_MIN_RATIO * leg_length < feet_gap
            && feet_gap < FEET_APART_MAX_RATIO * leg_length;

        let feedback = if (wrist_l.y - shoulder_l.y).abs() < ARM_EXTENSION_MIN
            || (wrist_r.y - shoulder_r.y).abs() < ARM_EXTENSION_MIN
        {
            Feedback::ExtendArms
        } else {
            Feedback::GoodTempo
        };

        match self.phase {
            JumpingJackPhase::Closed if arms_up && feet_apart => {
                self.phase = JumpingJackPhase::Open;
                RepOutcome::hold(feedback)
            }
            JumpingJackPhase::Open if arms_down && feet_together => {
                debug!("jumping jack completed");
                self.phase = JumpingJackPhase::Closed;
                RepOutcome::completed(feedback)
            }
            _ => RepOutcome::hold(feedback),
        }
    }

    fn phase(&self) -> &'static str {
        match self.phase {
            JumpingJackPhase::Closed => "closed",
            JumpingJackPhase::Open => "open",
        }
    }

    fn reset(&mut self) {
        self.phase = JumpingJackPhase::Closed;
    }
}
