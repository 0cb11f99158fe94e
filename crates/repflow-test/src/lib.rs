//! REPFLOW Test Harness - Synthetic streams and pipeline validation
//!
//! This crate provides:
//! - Canonical postures for every supported exercise
//! - Seeded, jittered frame generation
//! - Scripted frame sources and scenario replay
//! - End-to-end integration testing

pub mod integration;
pub mod scenario;
pub mod synthetic;

pub use integration::*;
pub use scenario::*;
pub use synthetic::*;
