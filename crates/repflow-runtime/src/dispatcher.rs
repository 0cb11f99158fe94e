//! Session dispatcher - routes frames to the active exercise's state

use serde::Serialize;
use tracing::{debug, info};

use repflow_core::{Detection, Exercise, Frame, RepflowResult};
use repflow_motion::{SamplerStats, SamplerThresholds};
use repflow_recognize::Feedback;

use crate::{DispatcherConfig, ExerciseSession};

/// Caller-facing result of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleOutcome {
    /// 0 or 1
    pub rep_delta: u32,
    /// Form cue, or the skip and lost-pose messages
    pub feedback: Feedback,
    /// Mean visibility of the configured confidence landmarks
    pub confidence: f32,
}

/// Per-dispatcher counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DispatcherStats {
    /// Ticks handled, lost ones included
    pub frames: u64,
    /// Frames that reached a recognizer
    pub analyzed: u64,
    /// Frames dropped by the sampler
    pub skipped: u64,
    /// Ticks without a detection
    pub lost: u64,
    /// Exercise changes, the first activation included
    pub switches: u64,
    /// Reps across every exercise handled by this dispatcher
    pub reps: u64,
}

/// Diagnostic view of a dispatcher
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DispatcherSnapshot {
    /// Active exercise, if any
    pub exercise: Option<Exercise>,
    /// Recognizer phase label
    pub phase: Option<&'static str>,
    /// Sampler thresholds of the active session
    pub thresholds: Option<SamplerThresholds>,
    /// Sampler skip counter
    pub skip_counter: Option<u32>,
    /// Reps of the active exercise session
    pub session_reps: u64,
    /// Sampler counters of the active session
    pub sampler: Option<SamplerStats>,
    /// Dispatcher-wide counters
    pub stats: DispatcherStats,
}

/// Owns the state of one client's frame stream.
///
/// At most one exercise is active. Switching exercise discards the previous
/// exercise's gate and recognizer entirely.
#[derive(Debug, Clone, Default)]
pub struct SessionDispatcher {
    config: DispatcherConfig,
    active: Option<ExerciseSession>,
    stats: DispatcherStats,
}

impl SessionDispatcher {
    /// Create a new dispatcher with the default config
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Create a new dispatcher with `config`
    pub fn with_config(config: DispatcherConfig) -> Self {
        SessionDispatcher {
            config,
            active: None,
            stats: DispatcherStats::default(),
        }
    }

    /// Process one frame for `exercise_id`.
    ///
    /// An unknown exercise fails with `UnsupportedExercise` before any state
    /// is touched.
    pub fn handle(&mut self, exercise_id: &str, frame: &Frame) -> RepflowResult<HandleOutcome> {
        let exercise: Exercise = exercise_id.parse()?;
        let confidence = frame.mean_visibility(&self.config.confidence_landmarks);
        let min_visibility = self.config.min_joint_visibility;

        let step = self.activate(exercise).feed(frame, min_visibility);
        self.stats.frames += 1;

        let outcome = match step {
            Some(outcome) => {
                self.stats.analyzed += 1;
                self.stats.reps += u64::from(outcome.rep_delta());
                HandleOutcome {
                    rep_delta: outcome.rep_delta(),
                    feedback: outcome.feedback(),
                    confidence,
                }
            }
            None => {
                self.stats.skipped += 1;
                HandleOutcome {
                    rep_delta: 0,
                    feedback: Feedback::Analyzing,
                    confidence,
                }
            }
        };
        Ok(outcome)
    }

    /// Record a tick with no detection for `exercise_id`.
    pub fn handle_lost(&mut self, exercise_id: &str) -> RepflowResult<HandleOutcome> {
        let exercise: Exercise = exercise_id.parse()?;
        self.activate(exercise).feed_lost();
        self.stats.frames += 1;
        self.stats.lost += 1;
        debug!(%exercise, "pose lost");

        Ok(HandleOutcome {
            rep_delta: 0,
            feedback: Feedback::NoPose,
            confidence: 0.0,
        })
    }

    /// Handle one tick, pose or lost
    pub fn handle_detection(
        &mut self,
        exercise_id: &str,
        detection: &Detection,
    ) -> RepflowResult<HandleOutcome> {
        match detection {
            Detection::Pose(frame) => self.handle(exercise_id, frame),
            Detection::Lost => self.handle_lost(exercise_id),
        }
    }

    /// Drop the active exercise; the next frame starts from scratch
    pub fn reset(&mut self) {
        if let Some(session) = self.active.take() {
            debug!(exercise = %session.exercise(), reps = session.reps(), "session reset");
        }
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> DispatcherSnapshot {
        let active = self.active.as_ref();
        DispatcherSnapshot {
            exercise: active.map(ExerciseSession::exercise),
            phase: active.map(ExerciseSession::phase),
            thresholds: active.map(ExerciseSession::thresholds),
            skip_counter: active.map(|s| s.gate().sampler().skip_counter()),
            session_reps: active.map_or(0, ExerciseSession::reps),
            sampler: active.map(|s| s.sampler_stats().clone()),
            stats: self.stats.clone(),
        }
    }

    /// Exercise of the active session
    pub fn active_exercise(&self) -> Option<Exercise> {
        self.active.as_ref().map(ExerciseSession::exercise)
    }

    /// Active session, if any
    pub fn active_session(&self) -> Option<&ExerciseSession> {
        self.active.as_ref()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn stats(&self) -> &DispatcherStats {
        &self.stats
    }

    fn activate(&mut self, exercise: Exercise) -> &mut ExerciseSession {
        let previous = self.active_exercise();
        if previous != Some(exercise) {
            info!(?previous, %exercise, "exercise switched");
            self.stats.switches += 1;
            self.active = None;
        }
        let config = &self.config;
        self.active
            .get_or_insert_with(|| ExerciseSession::new(exercise, config))
    }
}
