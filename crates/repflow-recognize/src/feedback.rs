//! Caller-facing feedback strings

use std::fmt;

use serde::{Serialize, Serializer};

/// Qualitative feedback attached to every outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    GoodForm,
    KneesBehindToes,
    ExtendArms,
    GoodTempo,
    CoreTight,
    HipsInLine,
    LiftKnees,
    KeepGoing,
    /// Frame was gated out by the sampler
    Analyzing,
    /// No usable pose this tick
    NoPose,
}

impl Feedback {
    /// User-facing message
    pub fn as_str(self) -> &'static str {
        match self {
            Feedback::GoodForm => "Good form",
            Feedback::KneesBehindToes => "Keep knees behind toes",
            Feedback::ExtendArms => "Extend arms fully",
            Feedback::GoodTempo => "Good tempo",
            Feedback::CoreTight => "Keep your core tight",
            Feedback::HipsInLine => "Keep hips in line",
            Feedback::LiftKnees => "Lift knees higher",
            Feedback::KeepGoing => "Keep going!",
            Feedback::Analyzing => "Analyzing pose...",
            Feedback::NoPose => "No pose detected",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Feedback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
