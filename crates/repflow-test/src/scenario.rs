//! Scripted scenarios
//!
//! A scenario is an exercise plus an ordered script of detections. It can be
//! replayed through a [`SessionDispatcher`] directly, or handed to anything
//! that consumes a [`FrameSource`].

use std::collections::VecDeque;

use tracing::debug;

use repflow_core::{Detection, Exercise, Frame, RepflowResult};
use repflow_recognize::Feedback;
use repflow_runtime::{DispatcherSnapshot, FrameSource, SessionDispatcher};

/// Replays a fixed list of detections
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    detections: VecDeque<Detection>,
}

impl ScriptedSource {
    /// Create a new, empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one detection
    pub fn push(&mut self, detection: impl Into<Detection>) {
        self.detections.push_back(detection.into());
    }

    /// Queue frames as detections
    pub fn extend_frames(&mut self, frames: impl IntoIterator<Item = Frame>) {
        self.detections.extend(frames.into_iter().map(Detection::Pose));
    }

    /// Queue `ticks` lost detections
    pub fn lose(&mut self, ticks: usize) {
        self.detections
            .extend(std::iter::repeat(Detection::Lost).take(ticks));
    }

    /// Ticks not yet replayed
    pub fn remaining(&self) -> usize {
        self.detections.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.detections.is_empty()
    }
}

impl FromIterator<Detection> for ScriptedSource {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        ScriptedSource {
            detections: iter.into_iter().collect(),
        }
    }
}

impl FrameSource for ScriptedSource {
    fn next_detection(&mut self) -> Option<Detection> {
        self.detections.pop_front()
    }
}

/// Exercise plus script
#[derive(Debug, Clone)]
pub struct Scenario {
    exercise_id: String,
    script: Vec<Detection>,
}

/// What a scenario produced, tick by tick
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Rep delta per tick
    pub deltas: Vec<u32>,
    /// Feedback per tick
    pub feedback: Vec<Feedback>,
    /// Dispatcher state after the last tick
    pub snapshot: DispatcherSnapshot,
}

impl ScenarioResult {
    /// Total reps counted
    pub fn reps(&self) -> u64 {
        self.deltas.iter().map(|d| u64::from(*d)).sum()
    }

    /// Ticks that reported a completed rep
    pub fn rep_ticks(&self) -> Vec<usize> {
        self.deltas
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 1)
            .map(|(i, _)| i)
            .collect()
    }

    /// `feedback` was reported at least once
    pub fn saw_feedback(&self, feedback: Feedback) -> bool {
        self.feedback.contains(&feedback)
    }
}

impl Scenario {
    /// Create a new scenario for a supported exercise
    pub fn new(exercise: Exercise) -> Self {
        Self::named(exercise.name())
    }

    /// Scenario under a raw exercise identifier, which may be unsupported
    pub fn named(exercise_id: impl Into<String>) -> Self {
        Scenario {
            exercise_id: exercise_id.into(),
            script: Vec::new(),
        }
    }

    /// Append frames to the script
    pub fn frames(mut self, frames: impl IntoIterator<Item = Frame>) -> Self {
        self.script.extend(frames.into_iter().map(Detection::Pose));
        self
    }

    /// Append `ticks` lost detections
    pub fn lose(mut self, ticks: usize) -> Self {
        self.script
            .extend(std::iter::repeat(Detection::Lost).take(ticks));
        self
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn exercise_id(&self) -> &str {
        &self.exercise_id
    }

    /// Source that replays the script from the start
    pub fn to_source(&self) -> ScriptedSource {
        self.script.iter().cloned().collect()
    }

    /// Replay on a fresh dispatcher
    pub fn run(&self) -> RepflowResult<ScenarioResult> {
        self.run_on(&mut SessionDispatcher::new())
    }

    /// Replay on an existing dispatcher, continuing whatever state it holds
    pub fn run_on(&self, dispatcher: &mut SessionDispatcher) -> RepflowResult<ScenarioResult> {
        let mut deltas = Vec::with_capacity(self.script.len());
        let mut feedback = Vec::with_capacity(self.script.len());

        let mut source = self.to_source();
        while let Some(detection) = source.next_detection() {
            let outcome = dispatcher.handle_detection(&self.exercise_id, &detection)?;
            deltas.push(outcome.rep_delta);
            feedback.push(outcome.feedback);
        }

        let result = ScenarioResult {
            deltas,
            feedback,
            snapshot: dispatcher.snapshot(),
        };
        debug!(
            exercise = %self.exercise_id,
            ticks = self.script.len(),
            reps = result.reps(),
            "scenario replayed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{standing, PoseSynth};

    #[test]
    fn test_scripted_source_order() {
        let mut source = ScriptedSource::new();
        source.push(standing());
        source.lose(2);
        assert_eq!(source.remaining(), 3);

        assert!(matches!(source.next_detection(), Some(Detection::Pose(_))));
        assert_eq!(source.next_detection(), Some(Detection::Lost));
        assert_eq!(source.next_detection(), Some(Detection::Lost));
        assert_eq!(source.next_detection(), None);
        assert!(source.is_exhausted());
    }

    #[test]
    fn test_scenario_collects_per_tick() {
        let mut synth = PoseSynth::new(3);
        let scenario = Scenario::new(Exercise::Squats)
            .frames(synth.hold(&standing(), 4))
            .lose(1);

        let result = scenario.run().unwrap();
        assert_eq!(result.deltas.len(), 5);
        assert_eq!(result.feedback[4], Feedback::NoPose);
        assert_eq!(result.reps(), 0);
        assert_eq!(result.snapshot.stats.lost, 1);
    }

    #[test]
    fn test_unsupported_scenario_fails() {
        let scenario = Scenario::named("pushups").frames(vec![standing()]);
        assert!(scenario.run().is_err());
    }
}
