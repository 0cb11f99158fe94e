//! Motion Estimator - how much did the body move since the last frame?

use std::fmt;

use repflow_core::{Frame, PoseLandmark};

/// Mean per-landmark image-plane displacement between consecutive frames
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct MotionScore(f32);

impl MotionScore {
    /// Score of the first frame of a stream; always above any threshold
    pub const FIRST: MotionScore = MotionScore(f32::INFINITY);

    /// No movement at all
    pub const ZERO: MotionScore = MotionScore(0.0);

    /// Negative and NaN inputs clamp to zero
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        MotionScore(value.max(0.0))
    }

    /// Raw mean displacement
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Score of the first frame after a reset
    #[inline]
    pub fn is_first(self) -> bool {
        self.0.is_infinite()
    }
}

impl fmt::Debug for MotionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_first() {
            write!(f, "Motion(first)")
        } else {
            write!(f, "Motion({:.4})", self.0)
        }
    }
}

/// Motion estimator
///
/// Its timeline is continuous: every frame it sees becomes the new
/// reference, whether or not the frame is analyzed downstream.
#[derive(Debug, Default, Clone)]
pub struct MotionEstimator {
    previous: Option<Frame>,
}

impl MotionEstimator {
    /// Create a new estimator with no reference frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `frame` against the previous frame and make it the reference
    pub fn estimate(&mut self, frame: &Frame) -> MotionScore {
        let score = match &self.previous {
            None => MotionScore::FIRST,
            Some(prev) => {
                let total: f32 = frame
                    .landmarks()
                    .iter()
                    .zip(prev.landmarks().iter())
                    .map(|(curr, prev)| curr.distance_2d(prev))
                    .sum();
                MotionScore::new(total / PoseLandmark::COUNT as f32)
            }
        };

        self.previous = Some(frame.clone());
        score
    }

    /// Has a reference frame been recorded?
    pub fn has_reference(&self) -> bool {
        self.previous.is_some()
    }

    /// Forget the reference frame
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use repflow_core::{FrameTime, Landmark};

    fn frame_at(x: f32, y: f32) -> Frame {
        Frame::from_array(FrameTime::ZERO, [Landmark::at(x, y); PoseLandmark::COUNT])
    }

    #[test]
    fn test_first_frame_is_sentinel() {
        let mut est = MotionEstimator::new();
        assert!(!est.has_reference());
        assert!(est.estimate(&frame_at(0.1, 0.9)).is_first());
        assert!(est.has_reference());
    }

    #[test]
    fn test_identical_frames_score_zero() {
        let mut est = MotionEstimator::new();
        est.estimate(&frame_at(0.5, 0.5));
        assert_eq!(est.estimate(&frame_at(0.5, 0.5)).value(), 0.0);
    }

    #[test]
    fn test_mean_displacement() {
        let mut est = MotionEstimator::new();
        est.estimate(&frame_at(0.0, 0.0));
        // Every landmark moves by a 3-4-5 triangle scaled to 0.05
        let score = est.estimate(&frame_at(0.03, 0.04));
        assert!((score.value() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_single_landmark_is_averaged() {
        let mut est = MotionEstimator::new();
        est.estimate(&frame_at(0.5, 0.5));

        let mut moved = [Landmark::at(0.5, 0.5); PoseLandmark::COUNT];
        moved[0] = Landmark::at(0.5, 0.5 + 0.33);
        let score = est.estimate(&Frame::from_array(FrameTime::ZERO, moved));
        assert!((score.value() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_depth_and_visibility_ignored() {
        let mut est = MotionEstimator::new();
        est.estimate(&frame_at(0.5, 0.5));

        let shifted = [Landmark::new(0.5, 0.5, 3.0, 0.0); PoseLandmark::COUNT];
        let score = est.estimate(&Frame::from_array(FrameTime::ZERO, shifted));
        assert_eq!(score.value(), 0.0);
    }

    #[test]
    fn test_reset_restores_sentinel() {
        let mut est = MotionEstimator::new();
        est.estimate(&frame_at(0.5, 0.5));
        est.reset();
        assert!(est.estimate(&frame_at(0.5, 0.5)).is_first());
    }

    proptest! {
        #[test]
        fn prop_score_is_non_negative(
            a in proptest::collection::vec((0.0f32..1.0, 0.0f32..1.0), PoseLandmark::COUNT),
            b in proptest::collection::vec((0.0f32..1.0, 0.0f32..1.0), PoseLandmark::COUNT),
        ) {
            let to_frame = |pts: &[(f32, f32)]| {
                let lms: Vec<Landmark> = pts.iter().map(|(x, y)| Landmark::at(*x, *y)).collect();
                Frame::new(FrameTime::ZERO, &lms).unwrap()
            };
            let mut est = MotionEstimator::new();
            est.estimate(&to_frame(&a));
            let score = est.estimate(&to_frame(&b));
            prop_assert!(score.value() >= 0.0);
            prop_assert!(score.value().is_finite());
        }
    }
}
