//! High knees recognizer
//!
//! A rep is one drive on each leg: whichever knee comes up first is latched,
//! and the opposite knee coming up closes the rep. Driving the same knee
//! twice in a row does nothing, and the closing knee has to come back down
//! before it can open the next rep.

use tracing::debug;

use repflow_core::{Exercise, Frame, Landmark, PoseLandmark};

use crate::{Feedback, RepOutcome, Recognizer};

/// Knee counts as raised once it is within this distance below the hip
pub const KNEE_RAISE_MARGIN: f32 = 0.05;

/// Knee within this distance below the hip is a lift that fell short
pub const PARTIAL_LIFT_MARGIN: f32 = 0.15;

const REQUIRED: &[PoseLandmark] = &[
    PoseLandmark::LeftHip,
    PoseLandmark::RightHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::RightKnee,
];

/// Which leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The other leg
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Progress through one left-right pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighKneesPhase {
    #[default]
    Grounded,
    /// First knee of the rep is up
    Driven(Side),
    /// Rep closed by this knee; it must come down before it can open another
    Finishing(Side),
}

/// Knee lifted to roughly hip height
pub fn is_knee_raised(knee: &Landmark, hip: &Landmark) -> bool {
    knee.y < hip.y + KNEE_RAISE_MARGIN
}

fn is_partial_lift(knee: &Landmark, hip: &Landmark) -> bool {
    knee.y < hip.y + PARTIAL_LIFT_MARGIN && !is_knee_raised(knee, hip)
}

/// Counts high knees, one rep per left-right pair
#[derive(Debug, Clone, Default)]
pub struct HighKneesRecognizer {
    phase: HighKneesPhase,
}

impl HighKneesRecognizer {
    /// Create a new recognizer with both feet down
    pub fn new() -> Self {
        Self::default()
    }

    pub fn knees_phase(&self) -> HighKneesPhase {
        self.phase
    }
}

impl Recognizer for HighKneesRecognizer {
    fn exercise(&self) -> Exercise {
        Exercise::HighKnees
    }

    fn required_landmarks(&self) -> &'static [PoseLandmark] {
        REQUIRED
    }

    fn evaluate(&mut self, frame: &Frame) -> RepOutcome {
        let hip_l = frame.landmark(PoseLandmark::LeftHip);
        let hip_r = frame.landmark(PoseLandmark::RightHip);
        let knee_l = frame.landmark(PoseLandmark::LeftKnee);
        let knee_r = frame.landmark(PoseLandmark::RightKnee);

        let left_up = is_knee_raised(knee_l, hip_l);
        let right_up = is_knee_raised(knee_r, hip_r);

        // Both up at once is ambiguous and drives neither side
        let driven = match (left_up, right_up) {
            (true, false) => Some(Side::Left),
            (false, true) => Some(Side::Right),
            _ => None,
        };

        let feedback = if !left_up
            && !right_up
            && (is_partial_lift(knee_l, hip_l) || is_partial_lift(knee_r, hip_r))
        {
            Feedback::LiftKnees
        } else {
            Feedback::KeepGoing
        };

        match (self.phase, driven) {
            (HighKneesPhase::Grounded, Some(side)) => {
                self.phase = HighKneesPhase::Driven(side);
                RepOutcome::hold(feedback)
            }
            (HighKneesPhase::Driven(latched), Some(side)) if side == latched.opposite() => {
                debug!(?side, "high knees rep completed");
                self.phase = HighKneesPhase::Finishing(side);
                RepOutcome::completed(feedback)
            }
            (HighKneesPhase::Finishing(closing), driven) if driven != Some(closing) => {
                self.phase = match driven {
                    Some(side) => HighKneesPhase::Driven(side),
                    None => HighKneesPhase::Grounded,
                };
                RepOutcome::hold(feedback)
            }
            _ => RepOutcome::hold(feedback),
        }
    }

    fn phase(&self) -> &'static str {
        match self.phase {
            HighKneesPhase::Grounded => "grounded",
            HighKneesPhase::Driven(Side::Left) => "left_driven",
            HighKneesPhase::Driven(Side::Right) => "right_driven",
            HighKneesPhase::Finishing(Side::Left) => "left_finishing",
            HighKneesPhase::Finishing(Side::Right) => "right_finishing",
        }
    }

    fn reset(&mut self) {
        self.phase = HighKneesPhase::Grounded;
    }
}
