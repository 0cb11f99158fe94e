//! End-to-end Integration Test Suite
//!
//! Full pipeline runs (estimator, sampler, recognizer, dispatcher) over
//! synthetic streams:
//! - Rep counting per exercise under jitter and frame skipping
//! - Exercise switches and unknown identifiers
//! - Lost detections in the middle of a rep
//! - Session isolation in the registry
//! - Workout plans driven from a frame source

use repflow_core::{Exercise, Frame};

use crate::scenario::Scenario;
use crate::synthetic::{
    burpee_crouch, burpee_plank, climber, jack_closed, jack_open, knees, squat_bottom, standing,
    PoseSynth,
};

/// Ticks each posture is held. At least the low-motion stride, so every
/// posture is analyzed at least once.
pub const HOLD_TICKS: usize = 6;

/// The posture cycle making up one rep of `exercise`
pub fn rep_postures(exercise: Exercise) -> Vec<Frame> {
    match exercise {
        Exercise::Squats => vec![standing(), squat_bottom()],
        Exercise::Burpees => vec![standing(), burpee_crouch(), burpee_plank()],
        Exercise::JumpingJacks => vec![jack_closed(), jack_open()],
        Exercise::MountainClimbers => {
            vec![climber(false, false), climber(false, true), climber(true, false)]
        }
        Exercise::HighKnees => vec![knees(false, false), knees(true, false), knees(false, true)],
    }
}

/// The posture a set ends on, closing the last rep
pub fn rest_posture(exercise: Exercise) -> Frame {
    rep_postures(exercise).swap_remove(0)
}

/// `reps` clean repetitions followed by the rest posture
pub fn exercise_scenario(exercise: Exercise, synth: &mut PoseSynth, reps: usize) -> Scenario {
    let postures = rep_postures(exercise);
    Scenario::new(exercise)
        .frames(synth.cycle(&postures, HOLD_TICKS, reps))
        .frames(synth.hold(&rest_posture(exercise), HOLD_TICKS))
}
