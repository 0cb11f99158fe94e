//! Workout driver
//!
//! A plan is a list of sets, each an ordered list of exercise cycles. The
//! runner feeds a fixed number of ticks from a [`FrameSource`] to each cycle
//! and tallies the reps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use repflow_core::{Detection, Exercise, RepflowError, RepflowResult};

use crate::{FrameSource, SessionDispatcher};

/// One set of a workout
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// Exercises in the order they are performed
    pub cycles: Vec<Exercise>,
}

/// Ordered list of sets
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    sets: Vec<WorkoutSet>,
}

impl WorkoutPlan {
    /// Create a new, empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a set with the given cycles
    pub fn with_set(mut self, cycles: Vec<Exercise>) -> Self {
        self.sets.push(WorkoutSet { cycles });
        self
    }

    /// Append another copy of the first set's cycles. No-op on an empty plan.
    pub fn repeat_first(mut self) -> Self {
        if let Some(first) = self.sets.first().cloned() {
            self.sets.push(first);
        }
        self
    }

    /// Build from exercise names, one slice per set
    pub fn from_names(sets: &[&[&str]]) -> RepflowResult<Self> {
        let mut plan = WorkoutPlan::new();
        for names in sets {
            let cycles = names
                .iter()
                .map(|name| name.parse())
                .collect::<RepflowResult<Vec<Exercise>>>()?;
            plan = plan.with_set(cycles);
        }
        plan.validate()?;
        Ok(plan)
    }

    /// At least one set, and no empty set
    pub fn validate(&self) -> RepflowResult<()> {
        if self.sets.is_empty() || self.sets.iter().any(|s| s.cycles.is_empty()) {
            return Err(RepflowError::EmptyWorkout);
        }
        Ok(())
    }

    /// Sets in order
    pub fn sets(&self) -> &[WorkoutSet] {
        &self.sets
    }

    /// `(set_number, cycle_number, exercise)`, numbered from 1
    pub fn cycles(&self) -> impl Iterator<Item = (usize, usize, Exercise)> + '_ {
        self.sets.iter().enumerate().flat_map(|(s, set)| {
            set.cycles
                .iter()
                .enumerate()
                .map(move |(c, exercise)| (s + 1, c + 1, *exercise))
        })
    }
}

/// Reps for one cycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRow {
    /// Set, numbered from 1
    pub set_number: usize,
    /// Cycle within the set, numbered from 1
    pub cycle_number: usize,
    /// Exercise of this cycle
    pub exercise: Exercise,
    /// Reps counted during the cycle
    pub reps: u64,
}

/// Result of running a plan
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutTally {
    /// One row per completed cycle
    pub rows: Vec<WorkoutRow>,
    /// Reps per exercise across all sets
    pub totals: BTreeMap<Exercise, u64>,
    /// The source ended before the plan finished
    pub truncated: bool,
}

impl WorkoutTally {
    fn record(&mut self, row: WorkoutRow) {
        *self.totals.entry(row.exercise).or_insert(0) += row.reps;
        self.rows.push(row);
    }

    /// Reps of `exercise` across the whole plan
    pub fn total(&self, exercise: Exercise) -> u64 {
        self.totals.get(&exercise).copied().unwrap_or(0)
    }

    /// Reps across every exercise
    pub fn total_reps(&self) -> u64 {
        self.totals.values().sum()
    }
}

/// Drives a plan over a frame source
#[derive(Clone, Debug)]
pub struct WorkoutRunner {
    plan: WorkoutPlan,
    frames_per_cycle: usize,
}

impl WorkoutRunner {
    /// Create a new runner giving each cycle `frames_per_cycle` ticks
    pub fn new(plan: WorkoutPlan, frames_per_cycle: usize) -> RepflowResult<Self> {
        plan.validate()?;
        if frames_per_cycle == 0 {
            return Err(RepflowError::Config("frames_per_cycle must be positive".into()));
        }
        Ok(WorkoutRunner {
            plan,
            frames_per_cycle,
        })
    }

    pub fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    /// Run every cycle in order. Each cycle starts from a fresh session, even
    /// when it repeats the previous exercise.
    pub fn run<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        dispatcher: &mut SessionDispatcher,
    ) -> RepflowResult<WorkoutTally> {
        let mut tally = WorkoutTally::default();

        for (set_number, cycle_number, exercise) in self.plan.cycles() {
            info!(set_number, cycle_number, %exercise, "cycle started");
            dispatcher.reset();

            let mut reps = 0u64;
            let mut ticks = 0;
            while ticks < self.frames_per_cycle {
                let Some(detection) = source.next_detection() else {
                    tally.truncated = true;
                    break;
                };
                let outcome = match &detection {
                    Detection::Pose(frame) => dispatcher.handle(exercise.name(), frame)?,
                    Detection::Lost => dispatcher.handle_lost(exercise.name())?,
                };
                reps += u64::from(outcome.rep_delta);
                ticks += 1;
            }

            info!(set_number, cycle_number, %exercise, reps, "cycle finished");
            tally.record(WorkoutRow {
                set_number,
                cycle_number,
                exercise,
                reps,
            });

            if tally.truncated {
                warn!(set_number, cycle_number, "frame source ended early");
                break;
            }
        }

        Ok(tally)
    }
}
