//! Burpee recognizer
//!
//! Reads the left side of the body:
//!
//! ```text
//! Standing --crouch--> Crouched --plank--> Plank --upright--> Standing (+1)
//!     \________________plank_______________/
//! Crouched --upright--> Standing (a squat, not a burpee)
//! ```
//!
//! Standing may jump straight to Plank because the crouch can fall between
//! sampled frames.

use tracing::debug;

use repflow_core::geometry::{horizontal_gap, is_above, vertical_gap};
use repflow_core::{Exercise, Frame, Landmark, PoseLandmark};

use crate::squat::{is_squatting, is_standing};
use crate::{Feedback, RepOutcome, Recognizer};

/// In a crouch the shoulders stay at least this far above the hips
pub const CROUCH_TORSO_MIN: f32 = 0.1;

/// Plank: shoulder, hip and ankle heights within this band
pub const PLANK_LEVEL_TOLERANCE: f32 = 0.15;

/// Plank: body stretched at least this far horizontally (shoulder to ankle)
pub const PLANK_MIN_SPAN: f32 = 0.3;

/// Hips this far below the shoulder-ankle line read as sagging
pub const HIP_SAG_TOLERANCE: f32 = 0.05;

const REQUIRED: &[PoseLandmark] = &[
    PoseLandmark::LeftShoulder,
    PoseLandmark::LeftHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::LeftAnkle,
];

/// Where the athlete is in the burpee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BurpeePhase {
    #[default]
    Standing,
    Crouched,
    Plank,
}

/// Hips dropped to knee height with the torso still upright
pub fn is_crouched(shoulder: &Landmark, hip: &Landmark, knee: &Landmark) -> bool {
    is_squatting(hip, knee) && shoulder.y < hip.y - CROUCH_TORSO_MIN
}

/// Body roughly horizontal and stretched out
pub fn is_plank(shoulder: &Landmark, hip: &Landmark, ankle: &Landmark) -> bool {
    vertical_gap(shoulder, hip) < PLANK_LEVEL_TOLERANCE
        && vertical_gap(hip, ankle) < PLANK_LEVEL_TOLERANCE
        && horizontal_gap(shoulder, ankle) > PLANK_MIN_SPAN
}

fn hips_sagging(shoulder: &Landmark, hip: &Landmark, ankle: &Landmark) -> bool {
    hip.y > (shoulder.y + ankle.y) * 0.5 + HIP_SAG_TOLERANCE
}

/// Counts burpees: crouch, plank, back up
#[derive(Debug, Clone, Default)]
pub struct BurpeeRecognizer {
    phase: BurpeePhase,
}

impl BurpeeRecognizer {
    /// Create a new recognizer in the standing phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn burpee_phase(&self) -> BurpeePhase {
        self.phase
    }
}

impl Recognizer for BurpeeRecognizer {
    fn exercise(&self) -> Exercise {
        Exercise::Burpees
    }

    fn required_landmarks(&self) -> &'static [PoseLandmark] {
        REQUIRED
    }

    fn evaluate(&mut self, frame: &Frame) -> RepOutcome {
        let shoulder = frame.landmark(PoseLandmark::LeftShoulder);
        let hip = frame.landmark(PoseLandmark::LeftHip);
        let knee = frame.landmark(PoseLandmark::LeftKnee);
        let ankle = frame.landmark(PoseLandmark::LeftAnkle);

        let upright = is_standing(shoulder, hip, knee, ankle) && is_above(shoulder, hip);
        let crouched = is_crouched(shoulder, hip, knee);
        let plank = is_plank(shoulder, hip, ankle);

        let mut completed = false;
        match self.phase {
            BurpeePhase::Standing if plank => self.phase = BurpeePhase::Plank,
            BurpeePhase::Standing if crouched => self.phase = BurpeePhase::Crouched,
            BurpeePhase::Crouched if plank => self.phase = BurpeePhase::Plank,
            BurpeePhase::Crouched if upright => self.phase = BurpeePhase::Standing,
            BurpeePhase::Plank if upright => {
                debug!("burpee completed");
                self.phase = BurpeePhase::Standing;
                completed = true;
            }
            _ => {}
        }

        let feedback = if plank && hips_sagging(shoulder, hip, ankle) {
            Feedback::HipsInLine
        } else {
            Feedback::CoreTight
        };

        if completed {
            RepOutcome::completed(feedback)
        } else {
            RepOutcome::hold(feedback)
        }
    }

    fn phase(&self) -> &'static str {
        match self.phase {
            BurpeePhase::Standing => "standing",
            BurpeePhase::Crouched => "crouched",
            BurpeePhase::Plank => "plank",
        }
    }

    fn reset(&mut self) {
        self.phase = BurpeePhase::Standing;
    }
}
