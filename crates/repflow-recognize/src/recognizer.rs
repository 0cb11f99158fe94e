//! Recognizer contract and the closed set of exercise machines

use tracing::trace;

use repflow_core::{Exercise, Frame, PoseLandmark};

use crate::{
    BurpeeRecognizer, Feedback, HighKneesRecognizer, JumpingJackRecognizer,
    MountainClimberRecognizer, SquatRecognizer,
};

/// Joints below this visibility are treated as missing
pub const MIN_JOINT_VISIBILITY: f32 = 0.05;

/// Result of feeding one frame to a recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepOutcome {
    completed: bool,
    feedback: Feedback,
}

impl RepOutcome {
    /// No repetition completed on this frame
    pub fn hold(feedback: Feedback) -> Self {
        RepOutcome {
            completed: false,
            feedback,
        }
    }

    /// This frame closed a repetition
    pub fn completed(feedback: Feedback) -> Self {
        RepOutcome {
            completed: true,
            feedback,
        }
    }

    /// Neutral result for frames that cannot be evaluated
    pub fn no_pose() -> Self {
        Self::hold(Feedback::NoPose)
    }

    /// 0 or 1
    #[inline]
    pub fn rep_delta(&self) -> u32 {
        u32::from(self.completed)
    }

    /// A rep finished on this frame
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Form cue for this frame
    #[inline]
    pub fn feedback(&self) -> Feedback {
        self.feedback
    }
}

/// Per-exercise posture state machine
pub trait Recognizer {
    fn exercise(&self) -> Exercise;

    /// Joints the machine inspects; all must be visible for a frame to count
    fn required_landmarks(&self) -> &'static [PoseLandmark];

    /// Advance the machine on a frame whose required joints are visible
    fn evaluate(&mut self, frame: &Frame) -> RepOutcome;

    /// Label of the current phase, for diagnostics
    fn phase(&self) -> &'static str;

    /// Back to the initial phase
    fn reset(&mut self);

    /// Visibility-guarded [`evaluate`](Self::evaluate)
    fn process_with(&mut self, frame: &Frame, min_visibility: f32) -> RepOutcome {
        if let Err(err) = frame.require_visible(self.required_landmarks(), min_visibility) {
            trace!(exercise = %self.exercise(), %err, "frame skipped");
            return RepOutcome::no_pose();
        }
        self.evaluate(frame)
    }

    fn process(&mut self, frame: &Frame) -> RepOutcome {
        self.process_with(frame, MIN_JOINT_VISIBILITY)
    }
}

/// One recognizer per supported exercise
#[derive(Debug, Clone)]
pub enum AnyRecognizer {
    Squats(SquatRecognizer),
    Burpees(BurpeeRecognizer),
    JumpingJacks(JumpingJackRecognizer),
    MountainClimbers(MountainClimberRecognizer),
    HighKnees(HighKneesRecognizer),
}

macro_rules! each_recognizer {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            AnyRecognizer::Squats($r) => $body,
            AnyRecognizer::Burpees($r) => $body,
            AnyRecognizer::JumpingJacks($r) => $body,
            AnyRecognizer::MountainClimbers($r) => $body,
            AnyRecognizer::HighKnees($r) => $body,
        }
    };
}

impl AnyRecognizer {
    /// Fresh machine in its initial phase
    pub fn for_exercise(exercise: Exercise) -> Self {
        match exercise {
            Exercise::Squats => AnyRecognizer::Squats(SquatRecognizer::new()),
            Exercise::Burpees => AnyRecognizer::Burpees(BurpeeRecognizer::new()),
            Exercise::JumpingJacks => AnyRecognizer::JumpingJacks(JumpingJackRecognizer::new()),
            Exercise::MountainClimbers => {
                AnyRecognizer::MountainClimbers(MountainClimberRecognizer::new())
            }
            Exercise::HighKnees => AnyRecognizer::HighKnees(HighKneesRecognizer::new()),
        }
    }
}

impl Recognizer for AnyRecognizer {
    fn exercise(&self) -> Exercise {
        each_recognizer!(self, r => r.exercise())
    }

    fn required_landmarks(&self) -> &'static [PoseLandmark] {
        each_recognizer!(self, r => r.required_landmarks())
    }

    fn evaluate(&mut self, frame: &Frame) -> RepOutcome {
        each_recognizer!(self, r => r.evaluate(frame))
    }

    fn phase(&self) -> &'static str {
        each_recognizer!(self, r => r.phase())
    }

    fn reset(&mut self) {
        each_recognizer!(self, r => r.reset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use repflow_core::{FrameTime, Landmark};

    #[test]
    fn test_outcome_delta() {
        assert_eq!(RepOutcome::hold(Feedback::GoodForm).rep_delta(), 0);
        assert_eq!(RepOutcome::completed(Feedback::GoodForm).rep_delta(), 1);
        assert_eq!(RepOutcome::no_pose().feedback().as_str(), "No pose detected");
    }

    #[test]
    fn test_for_exercise_matches() {
        for exercise in Exercise::all() {
            let r = AnyRecognizer::for_exercise(*exercise);
            assert_eq!(r.exercise(), *exercise);
            assert!(!r.required_landmarks().is_empty());
        }
    }

    #[test]
    fn test_invisible_frame_is_neutral() {
        let frame = Frame::from_array(
            FrameTime::ZERO,
            [Landmark::new(0.5, 0.5, 0.0, 0.0); PoseLandmark::COUNT],
        );
        for exercise in Exercise::all() {
            let mut r = AnyRecognizer::for_exercise(*exercise);
            let before = r.phase();
            assert_eq!(r.process(&frame), RepOutcome::no_pose());
            assert_eq!(r.phase(), before);
        }
    }

    fn arb_frame() -> impl Strategy<Value = Frame> {
        proptest::collection::vec((0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0), PoseLandmark::COUNT)
            .prop_map(|pts| {
                let lms: Vec<Landmark> = pts
                    .into_iter()
                    .map(|(x, y, v)| Landmark::new(x, y, 0.0, v))
                    .collect();
                Frame::new(FrameTime::ZERO, &lms).unwrap()
            })
    }

    proptest! {
        #[test]
        fn prop_delta_is_zero_or_one(frames in proptest::collection::vec(arb_frame(), 1..40)) {
            for exercise in Exercise::all() {
                let mut r = AnyRecognizer::for_exercise(*exercise);
                for frame in &frames {
                    prop_assert!(r.process(frame).rep_delta() <= 1);
                }
            }
        }
    }
}
