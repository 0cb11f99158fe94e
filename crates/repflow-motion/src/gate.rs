//! Frame gate - estimator and sampler bound to one exercise session

use repflow_core::{Exercise, Frame};

use crate::{AdaptiveSampler, MotionEstimator, MotionScore, SamplerThresholds};

/// Outcome of gating one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    /// Analyze this frame
    Process(MotionScore),
    /// Not worth analyzing; recognizer state must stay untouched
    Skip(MotionScore),
    /// No detection this tick; passed through
    PoseLost,
}

impl GateDecision {
    /// Frame goes on to the recognizer
    pub fn should_process(self) -> bool {
        !matches!(self, GateDecision::Skip(_))
    }

    /// Motion score, absent for a lost pose
    pub fn score(self) -> Option<MotionScore> {
        match self {
            GateDecision::Process(s) | GateDecision::Skip(s) => Some(s),
            GateDecision::PoseLost => None,
        }
    }
}

/// Estimator + sampler pair, tuned for a single exercise
#[derive(Debug, Clone)]
pub struct FrameGate {
    estimator: MotionEstimator,
    sampler: AdaptiveSampler,
}

impl FrameGate {
    /// Fresh gate with thresholds derived from the exercise
    pub fn new(exercise: Exercise) -> Self {
        let mut sampler = AdaptiveSampler::new();
        sampler.adjust_for(exercise);
        FrameGate {
            estimator: MotionEstimator::new(),
            sampler,
        }
    }

    /// Fresh gate with caller-supplied thresholds
    pub fn with_thresholds(thresholds: SamplerThresholds) -> Self {
        FrameGate {
            estimator: MotionEstimator::new(),
            sampler: AdaptiveSampler::with_thresholds(thresholds),
        }
    }

    /// Gate one tick. The estimator always advances on a detected frame.
    pub fn admit(&mut self, frame: Option<&Frame>) -> GateDecision {
        let score = frame.map(|f| self.estimator.estimate(f));
        let process = self.sampler.should_process_detection(score);

        match score {
            None => GateDecision::PoseLost,
            Some(score) if process => GateDecision::Process(score),
            Some(score) => GateDecision::Skip(score),
        }
    }

    /// Underlying estimator
    pub fn estimator(&self) -> &MotionEstimator {
        &self.estimator
    }

    pub fn sampler(&self) -> &AdaptiveSampler {
        &self.sampler
    }
}
