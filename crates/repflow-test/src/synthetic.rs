//! Synthetic poses for REPFLOW testing
//!
//! Canonical postures for every supported exercise, plus a seeded generator
//! that stamps them with advancing timestamps and small landmark jitter so
//! streams look like noisy detector output.

use std::time::Duration;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use repflow_core::{Frame, FrameBuilder, FrameTime, PoseLandmark};

/// Default landmark jitter, well inside every recognizer's margins
pub const DEFAULT_JITTER: f32 = 0.004;

/// ~30 fps
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(33_333);

// ============================================================================
// POSTURES
// ============================================================================

fn left_chain(shoulder: (f32, f32), hip: (f32, f32), knee: (f32, f32), ankle: (f32, f32)) -> Frame {
    FrameBuilder::new()
        .at(PoseLandmark::LeftShoulder, shoulder.0, shoulder.1)
        .at(PoseLandmark::LeftHip, hip.0, hip.1)
        .at(PoseLandmark::LeftKnee, knee.0, knee.1)
        .at(PoseLandmark::LeftAnkle, ankle.0, ankle.1)
        .build()
}

/// Upright, shoulder over hip over knee over ankle
pub fn standing() -> Frame {
    left_chain((0.5, 0.3), (0.5, 0.5), (0.5, 0.7), (0.5, 0.9))
}

/// Bottom of a squat, hips below knees
pub fn squat_bottom() -> Frame {
    left_chain((0.47, 0.45), (0.45, 0.75), (0.5, 0.7), (0.5, 0.9))
}

/// Hips dropped, torso still upright: first phase of a burpee
pub fn burpee_crouch() -> Frame {
    left_chain((0.5, 0.5), (0.45, 0.72), (0.55, 0.7), (0.5, 0.9))
}

/// Body horizontal, shoulder to ankle
pub fn burpee_plank() -> Frame {
    left_chain((0.3, 0.75), (0.5, 0.78), (0.65, 0.8), (0.8, 0.82))
}

fn jack_base() -> FrameBuilder {
    FrameBuilder::new()
        .at(PoseLandmark::LeftShoulder, 0.45, 0.3)
        .at(PoseLandmark::RightShoulder, 0.55, 0.3)
        .at(PoseLandmark::LeftHip, 0.47, 0.55)
        .at(PoseLandmark::RightHip, 0.53, 0.55)
}

/// Arms at the sides, feet together
pub fn jack_closed() -> Frame {
    jack_base()
        .at(PoseLandmark::LeftWrist, 0.43, 0.5)
        .at(PoseLandmark::RightWrist, 0.57, 0.5)
        .at(PoseLandmark::LeftFootIndex, 0.48, 0.95)
        .at(PoseLandmark::RightFootIndex, 0.52, 0.95)
        .build()
}

/// Arms overhead, feet apart
pub fn jack_open() -> Frame {
    jack_base()
        .at(PoseLandmark::LeftWrist, 0.35, 0.1)
        .at(PoseLandmark::RightWrist, 0.65, 0.1)
        .at(PoseLandmark::LeftFootIndex, 0.38, 0.95)
        .at(PoseLandmark::RightFootIndex, 0.60, 0.95)
        .build()
}

/// Plank with either knee optionally driven toward the chest
pub fn climber(left_in: bool, right_in: bool) -> Frame {
    let knee_x = |driven: bool| if driven { 0.4 } else { 0.6 };
    FrameBuilder::new()
        .at(PoseLandmark::LeftHip, 0.5, 0.5)
        .at(PoseLandmark::RightHip, 0.5, 0.52)
        .at(PoseLandmark::LeftKnee, knee_x(left_in), 0.6)
        .at(PoseLandmark::RightKnee, knee_x(right_in), 0.62)
        .build()
}

/// Standing with either knee optionally raised to hip height
pub fn knees(left_up: bool, right_up: bool) -> Frame {
    let knee_y = |up: bool| if up { 0.5 } else { 0.7 };
    FrameBuilder::new()
        .at(PoseLandmark::LeftHip, 0.45, 0.5)
        .at(PoseLandmark::RightHip, 0.55, 0.5)
        .at(PoseLandmark::LeftKnee, 0.45, knee_y(left_up))
        .at(PoseLandmark::RightKnee, 0.55, knee_y(right_up))
        .build()
}

/// `frame` with every landmark at the given visibility
pub fn dimmed(frame: &Frame, visibility: f32) -> Frame {
    FrameBuilder::from_frame(frame).visibility_all(visibility).build()
}

// ============================================================================
// GENERATOR
// ============================================================================

/// Seeded stream generator
pub struct PoseSynth {
    rng: StdRng,
    jitter: Option<Uniform<f32>>,
    clock: FrameTime,
    interval: Duration,
}

impl PoseSynth {
    /// Create a new generator with the default jitter
    pub fn new(seed: u64) -> Self {
        Self::with_jitter(seed, DEFAULT_JITTER)
    }

    /// Generator adding up to `amount` of uniform noise per coordinate
    pub fn with_jitter(seed: u64, amount: f32) -> Self {
        PoseSynth {
            rng: StdRng::seed_from_u64(seed),
            jitter: (amount > 0.0).then(|| Uniform::new_inclusive(-amount, amount)),
            clock: FrameTime::ZERO,
            interval: DEFAULT_FRAME_INTERVAL,
        }
    }

    /// Exact postures, no noise
    pub fn exact() -> Self {
        Self::with_jitter(0, 0.0)
    }

    /// Set the spacing between timestamps
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Timestamp of the next frame
    pub fn now(&self) -> FrameTime {
        self.clock
    }

    /// One noisy, time-stamped copy of `posture`
    pub fn frame(&mut self, posture: &Frame) -> Frame {
        let mut builder = FrameBuilder::from_frame(posture).timestamp(self.clock);
        if let Some(jitter) = &self.jitter {
            for which in PoseLandmark::all() {
                let mut lm = *posture.landmark(*which);
                lm.x += jitter.sample(&mut self.rng);
                lm.y += jitter.sample(&mut self.rng);
                builder = builder.landmark(*which, lm);
            }
        }
        self.clock = self.clock + self.interval;
        builder.build()
    }

    /// `ticks` consecutive frames of one posture
    pub fn hold(&mut self, posture: &Frame, ticks: usize) -> Vec<Frame> {
        (0..ticks).map(|_| self.frame(posture)).collect()
    }

    /// `reps` passes through `postures`, each held for `ticks`
    pub fn cycle(&mut self, postures: &[Frame], ticks: usize, reps: usize) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(postures.len() * ticks * reps);
        for _ in 0..reps {
            for posture in postures {
                frames.extend(self.hold(posture, ticks));
            }
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repflow_recognize::{
        AnyRecognizer, BurpeePhase, BurpeeRecognizer, Recognizer, SquatPhase, SquatRecognizer,
    };
    use repflow_core::Exercise;

    #[test]
    fn test_timestamps_advance() {
        let mut synth = PoseSynth::new(1);
        let frames = synth.hold(&standing(), 3);
        assert_eq!(frames[0].timestamp(), FrameTime::ZERO);
        assert!(frames[1].timestamp() > frames[0].timestamp());
        assert_eq!(synth.now(), FrameTime::ZERO + DEFAULT_FRAME_INTERVAL * 3);
    }

    #[test]
    fn test_jitter_is_seeded_and_bounded() {
        let a = PoseSynth::new(42).frame(&standing());
        let b = PoseSynth::new(42).frame(&standing());
        assert_eq!(a, b);

        let base = standing();
        for which in PoseLandmark::all() {
            let dx = (a.landmark(*which).x - base.landmark(*which).x).abs();
            assert!(dx <= DEFAULT_JITTER + 1e-6);
        }
    }

    #[test]
    fn test_exact_has_no_noise() {
        let frame = PoseSynth::exact().frame(&jack_open());
        assert_eq!(frame.landmarks(), jack_open().landmarks());
    }

    #[test]
    fn test_postures_read_as_intended() {
        let mut squat = SquatRecognizer::new();
        squat.process(&squat_bottom());
        assert_eq!(squat.squat_phase(), SquatPhase::Squatting);

        let mut burpee = BurpeeRecognizer::new();
        burpee.process(&burpee_crouch());
        assert_eq!(burpee.burpee_phase(), BurpeePhase::Crouched);
        burpee.process(&burpee_plank());
        assert_eq!(burpee.burpee_phase(), BurpeePhase::Plank);

        let mut knees_r = AnyRecognizer::for_exercise(Exercise::HighKnees);
        knees_r.process(&knees(true, false));
        assert_eq!(knees_r.phase(), "left_driven");
    }

    #[test]
    fn test_dimmed() {
        let frame = dimmed(&standing(), 0.0);
        assert!(frame.landmarks().iter().all(|lm| lm.visibility == 0.0));
    }
}
