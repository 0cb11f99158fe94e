//! Exercise identities and motion-intensity classes
//!
//! REPFLOW recognizes a closed set of exercises. Each one belongs to a
//! motion-intensity class that drives how aggressively frames are sampled:
//! - High: explosive, full-body movement - sample densely
//! - Moderate: rhythmic movement - sample every other frame when calm
//! - Low: holds and anything unclassified - sample sparsely

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RepflowError;

/// Supported exercise types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    Squats,
    Burpees,
    JumpingJacks,
    MountainClimbers,
    HighKnees,
}

impl Exercise {
    /// All exercises in a stable order
    pub fn all() -> &'static [Exercise] {
        &[
            Exercise::Burpees,
            Exercise::Squats,
            Exercise::HighKnees,
            Exercise::MountainClimbers,
            Exercise::JumpingJacks,
        ]
    }

    /// Canonical identifier used by callers
    pub fn name(self) -> &'static str {
        match self {
            Exercise::Squats => "squats",
            Exercise::Burpees => "burpees",
            Exercise::JumpingJacks => "jumping_jacks",
            Exercise::MountainClimbers => "mountain_climbers",
            Exercise::HighKnees => "high_knees",
        }
    }

    /// Motion-intensity class
    pub fn intensity(self) -> IntensityClass {
        match self {
            Exercise::Burpees | Exercise::JumpingJacks | Exercise::HighKnees => {
                IntensityClass::High
            }
            Exercise::MountainClimbers | Exercise::Squats => IntensityClass::Moderate,
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Exercise {
    type Err = RepflowError;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Exercise::all()
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RepflowError::UnsupportedExercise(s.to_string()))
    }
}

/// Motion-intensity class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityClass {
    High,
    Moderate,
    #[default]
    Low,
}

impl IntensityClass {
    /// Classify any exercise name; unknown names fall into `Low`
    pub fn for_name(name: &str) -> Self {
        name.parse::<Exercise>()
            .map(Exercise::intensity)
            .unwrap_or(IntensityClass::Low)
    }
}
