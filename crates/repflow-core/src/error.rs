//! Error types for REPFLOW

use thiserror::Error;

use crate::{PoseLandmark, SessionId};

/// Core REPFLOW errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepflowError {
    // Frame errors
    #[error("Invalid frame: expected {expected} landmarks, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },

    /// Flat buffer whose float count is not 33 × 4
    #[error("Invalid frame buffer: expected {expected} floats, got {actual}")]
    InvalidFrameBuffer { expected: usize, actual: usize },

    /// Soft condition: recognizers absorb it into a no-op outcome.
    #[error("Landmark {landmark:?} not visible (visibility {visibility:.3})")]
    MissingLandmarkVisibility {
        landmark: PoseLandmark,
        visibility: f32,
    },

    // Exercise errors
    #[error("Unsupported exercise: {0}")]
    UnsupportedExercise(String),

    // Sampler errors
    #[error("Invalid sampler thresholds: high {high}, low {low}")]
    InvalidThresholds { high: f32, low: f32 },

    // Session errors
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    // Workout errors
    #[error("Workout plan has no cycles")]
    EmptyWorkout,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for REPFLOW operations
pub type RepflowResult<T> = Result<T, RepflowError>;
