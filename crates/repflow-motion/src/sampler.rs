//! Adaptive Sampler - decide whether a frame is worth analyzing
//!
//! Motion bands:
//! - score > high: every frame (fast, explosive movement)
//! - low < score <= high: every 2nd frame
//! - score <= low: every 4th frame (near-static holds)
//!
//! A lost pose is always passed through so a miss is never swallowed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use repflow_core::{Exercise, IntensityClass, RepflowError, RepflowResult};

use crate::MotionScore;

/// Stride for moderate motion
pub const MODERATE_STRIDE: u32 = 2;

/// Stride for low motion
pub const LOW_STRIDE: u32 = 4;

/// Counter value after a reset. One increment lands on zero for both
/// strides, so the first gated frame is analyzed.
const SKIP_COUNTER_PRIMED: u32 = LOW_STRIDE - 1;

/// Motion thresholds of the sampler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerThresholds {
    /// Scores above this are always processed
    pub high: f32,
    /// Scores at or below this keep one frame in four
    pub low: f32,
}

impl Default for SamplerThresholds {
    fn default() -> Self {
        SamplerThresholds {
            high: 0.05,
            low: 0.02,
        }
    }
}

impl SamplerThresholds {
    /// Validated thresholds: finite, `high >= low >= 0`
    pub fn new(high: f32, low: f32) -> RepflowResult<Self> {
        if !high.is_finite() || !low.is_finite() || low < 0.0 || high < low {
            return Err(RepflowError::InvalidThresholds { high, low });
        }
        Ok(SamplerThresholds { high, low })
    }

    /// Fixed table keyed by motion-intensity class
    pub fn for_class(class: IntensityClass) -> Self {
        match class {
            IntensityClass::High => SamplerThresholds {
                high: 0.05,
                low: 0.03,
            },
            IntensityClass::Moderate => SamplerThresholds {
                high: 0.04,
                low: 0.02,
            },
            IntensityClass::Low => SamplerThresholds {
                high: 0.03,
                low: 0.01,
            },
        }
    }

    /// Motion band of a score
    pub fn band(&self, score: MotionScore) -> MotionBand {
        let value = score.value();
        if value > self.high {
            MotionBand::High
        } else if value > self.low {
            MotionBand::Moderate
        } else {
            MotionBand::Low
        }
    }
}

/// Which threshold band a motion score falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionBand {
    High,
    Moderate,
    Low,
}

/// Sampler decision counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerStats {
    /// Frames admitted
    pub processed: u64,
    /// Frames dropped
    pub skipped: u64,
    /// Pose-lost ticks passed through unconditionally
    pub forced: u64,
}

/// Adaptive frame sampler
#[derive(Debug, Clone)]
pub struct AdaptiveSampler {
    thresholds: SamplerThresholds,
    skip_counter: u32,
    stats: SamplerStats,
}

impl Default for AdaptiveSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveSampler {
    /// Sampler with the untuned default thresholds
    pub fn new() -> Self {
        Self::with_thresholds(SamplerThresholds::default())
    }

    /// Create a new sampler with explicit thresholds
    pub fn with_thresholds(thresholds: SamplerThresholds) -> Self {
        AdaptiveSampler {
            thresholds,
            skip_counter: SKIP_COUNTER_PRIMED,
            stats: SamplerStats::default(),
        }
    }

    /// Should the frame with this motion score be analyzed?
    pub fn should_process(&mut self, score: MotionScore) -> bool {
        let process = match self.thresholds.band(score) {
            MotionBand::High => {
                self.skip_counter = 0;
                true
            }
            MotionBand::Moderate => self.advance(MODERATE_STRIDE),
            MotionBand::Low => self.advance(LOW_STRIDE),
        };

        if process {
            self.stats.processed += 1;
        } else {
            self.stats.skipped += 1;
        }
        process
    }

    /// Like [`should_process`](Self::should_process), but `None` means the
    /// pose was lost this tick and is always passed through.
    pub fn should_process_detection(&mut self, score: Option<MotionScore>) -> bool {
        match score {
            Some(score) => self.should_process(score),
            None => {
                self.stats.forced += 1;
                true
            }
        }
    }

    /// Re-derive thresholds from the exercise's intensity class.
    ///
    /// Must run once whenever the active exercise changes, before the first
    /// `should_process` for it.
    pub fn adjust_for_exercise(&mut self, name: &str) -> SamplerThresholds {
        let class = IntensityClass::for_name(name);
        self.set_thresholds(SamplerThresholds::for_class(class));
        debug!(
            exercise = name,
            ?class,
            high = self.thresholds.high,
            low = self.thresholds.low,
            "sampler thresholds adjusted"
        );
        self.thresholds
    }

    /// Typed variant of [`adjust_for_exercise`](Self::adjust_for_exercise)
    pub fn adjust_for(&mut self, exercise: Exercise) -> SamplerThresholds {
        self.adjust_for_exercise(exercise.name())
    }

    /// Install explicit thresholds and restart the skip cycle
    pub fn set_thresholds(&mut self, thresholds: SamplerThresholds) {
        self.thresholds = thresholds;
        self.skip_counter = SKIP_COUNTER_PRIMED;
    }

    /// Thresholds currently in force
    pub fn thresholds(&self) -> SamplerThresholds {
        self.thresholds
    }

    /// Position in the current skip cycle
    pub fn skip_counter(&self) -> u32 {
        self.skip_counter
    }

    /// Decision counters since construction
    pub fn stats(&self) -> &SamplerStats {
        &self.stats
    }

    fn advance(&mut self, stride: u32) -> bool {
        self.skip_counter = (self.skip_counter + 1) % stride;
        self.skip_counter == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(sampler: &mut AdaptiveSampler, score: f32, n: usize) -> Vec<bool> {
        (0..n)
            .map(|_| sampler.should_process(MotionScore::new(score)))
            .collect()
    }

    #[test]
    fn test_low_motion_every_fourth() {
        let mut sampler = AdaptiveSampler::new();
        sampler.adjust_for_exercise("plank");

        let pattern = run(&mut sampler, 0.001, 8);
        assert_eq!(
            pattern,
            vec![true, false, false, false, true, false, false, false]
        );
        assert_eq!(sampler.stats().processed, 2);
        assert_eq!(sampler.stats().skipped, 6);
    }

    #[test]
    fn test_moderate_motion_every_second() {
        let mut sampler = AdaptiveSampler::new();
        sampler.adjust_for_exercise("plank");

        // Between 0.01 and 0.03
        let pattern = run(&mut sampler, 0.02, 6);
        assert_eq!(pattern, vec![true, false, true, false, true, false]);
    }

    #[test]
    fn test_high_motion_every_frame() {
        let mut sampler = AdaptiveSampler::new();
        sampler.adjust_for(Exercise::Burpees);

        assert!(run(&mut sampler, 0.2, 5).into_iter().all(|p| p));
        assert_eq!(sampler.skip_counter(), 0);
    }

    #[test]
    fn test_high_motion_resets_counter() {
        let mut sampler = AdaptiveSampler::new();
        sampler.adjust_for(Exercise::Squats);

        // Leave the counter mid-cycle
        run(&mut sampler, 0.0, 2);
        assert_ne!(sampler.skip_counter(), 0);

        assert!(sampler.should_process(MotionScore::FIRST));
        assert_eq!(sampler.skip_counter(), 0);
        // After a reset the low band needs a full stride again
        assert_eq!(run(&mut sampler, 0.0, 4), vec![false, false, false, true]);
    }

    #[test]
    fn test_threshold_boundaries() {
        let mut sampler = AdaptiveSampler::with_thresholds(SamplerThresholds::new(0.04, 0.02).unwrap());
        let t = sampler.thresholds();

        // Equal to high is moderate, equal to low is low
        assert_eq!(t.band(MotionScore::new(0.04)), MotionBand::Moderate);
        assert_eq!(t.band(MotionScore::new(0.02)), MotionBand::Low);
        assert_eq!(t.band(MotionScore::new(0.041)), MotionBand::High);
        assert!(sampler.should_process(MotionScore::new(0.041)));
    }

    #[test]
    fn test_lost_pose_always_processed() {
        let mut sampler = AdaptiveSampler::new();
        sampler.adjust_for_exercise("plank");
        run(&mut sampler, 0.0, 1);
        let counter = sampler.skip_counter();

        for _ in 0..5 {
            assert!(sampler.should_process_detection(None));
        }
        assert_eq!(sampler.skip_counter(), counter);
        assert_eq!(sampler.stats().forced, 5);
    }

    #[test]
    fn test_adjust_table() {
        let mut sampler = AdaptiveSampler::new();
        assert_eq!(sampler.thresholds(), SamplerThresholds { high: 0.05, low: 0.02 });

        assert_eq!(
            sampler.adjust_for_exercise("jumping_jacks"),
            SamplerThresholds { high: 0.05, low: 0.03 }
        );
        assert_eq!(
            sampler.adjust_for_exercise("mountain_climbers"),
            SamplerThresholds { high: 0.04, low: 0.02 }
        );
        assert_eq!(
            sampler.adjust_for_exercise("yoga"),
            SamplerThresholds { high: 0.03, low: 0.01 }
        );
    }

    #[test]
    fn test_invalid_thresholds() {
        assert!(SamplerThresholds::new(0.01, 0.02).is_err());
        assert!(SamplerThresholds::new(0.05, -0.01).is_err());
        assert!(SamplerThresholds::new(f32::NAN, 0.01).is_err());
        assert!(SamplerThresholds::new(0.02, 0.02).is_ok());
    }
}
