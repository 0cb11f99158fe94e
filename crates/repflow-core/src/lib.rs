//! REPFLOW Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout REPFLOW:
//! - Identifiers (SessionId)
//! - Time primitives (FrameTime)
//! - Pose landmarks, frames and detections
//! - Exercise identities and motion-intensity classes
//! - Planar geometry helpers shared by the recognizers

pub mod error;
pub mod exercise;
pub mod frame;
pub mod geometry;
pub mod id;
pub mod landmark;
pub mod time;

pub use error::*;
pub use exercise::*;
pub use frame::*;
pub use id::*;
pub use landmark::*;
pub use time::*;
