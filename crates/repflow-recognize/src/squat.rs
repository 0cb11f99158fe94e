//! Squat recognizer
//!
//! Reads the left side of the body. A rep is the full cycle
//! Standing -> Squatting -> Standing; the descent alone never counts.

use tracing::debug;

use repflow_core::geometry::{is_above, vertically_aligned};
use repflow_core::{Exercise, Frame, Landmark, PoseLandmark};

use crate::{Feedback, RepOutcome, Recognizer};

/// Max horizontal offset between consecutive joints of an upright chain
pub const ALIGNMENT_TOLERANCE: f32 = 0.1;

/// Hip counts as dropped once it is within this distance above the knee
pub const SQUAT_DEPTH_THRESHOLD: f32 = 0.15;

const REQUIRED: &[PoseLandmark] = &[
    PoseLandmark::LeftShoulder,
    PoseLandmark::LeftHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::LeftAnkle,
];

/// Standing tall or down in the squat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SquatPhase {
    #[default]
    Standing,
    Squatting,
}

/// Shoulder, hip, knee and ankle stacked vertically with hips above knees
pub fn is_standing(shoulder: &Landmark, hip: &Landmark, knee: &Landmark, ankle: &Landmark) -> bool {
    vertically_aligned(&[shoulder, hip, knee, ankle], ALIGNMENT_TOLERANCE) && is_above(hip, knee)
}

/// Hip has dropped close to or below knee height
pub fn is_squatting(hip: &Landmark, knee: &Landmark) -> bool {
    hip.y > knee.y - SQUAT_DEPTH_THRESHOLD
}

/// Counts squats on the return to standing
#[derive(Debug, Clone, Default)]
pub struct SquatRecognizer {
    phase: SquatPhase,
}

impl SquatRecognizer {
    /// Create a new recognizer in the standing phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn squat_phase(&self) -> SquatPhase {
        self.phase
    }
}

impl Recognizer for SquatRecognizer {
    fn exercise(&self) -> Exercise {
        Exercise::Squats
    }

    fn required_landmarks(&self) -> &'static [PoseLandmark] {
        REQUIRED
    }

    fn evaluate(&mut self, frame: &Frame) -> RepOutcome {
        let shoulder = frame.landmark(PoseLandmark::LeftShoulder);
        let hip = frame.landmark(PoseLandmark::LeftHip);
        let knee = frame.landmark(PoseLandmark::LeftKnee);
        let ankle = frame.landmark(PoseLandmark::LeftAnkle);

        let standing = is_standing(shoulder, hip, knee, ankle);
        let squatting = is_squatting(hip, knee);

        let feedback = if knee.x > ankle.x {
            Feedback::KneesBehindToes
        } else {
            Feedback::GoodForm
        };

        match self.phase {
            SquatPhase::Standing if squatting => {
                debug!(hip_y = hip.y, knee_y = knee.y, "squat started");
                self.phase = SquatPhase::Squatting;
                RepOutcome::hold(feedback)
            }
            SquatPhase::Squatting if standing => {
                debug!("squat completed");
                self.phase = SquatPhase::Standing;
                RepOutcome::completed(feedback)
            }
            _ => RepOutcome::hold(feedback),
        }
    }

    fn phase(&self) -> &'static str {
        match self.phase {
            SquatPhase::Standing => "standing",
            SquatPhase::Squatting => "squatting",
        }
    }

    fn reset(&mut self) {
        self.phase = SquatPhase::Standing;
    }
}
