//! REPFLOW Motion - Frame gating under varying movement
//!
//! This crate implements the front half of the pipeline:
//! - Motion estimation: mean landmark displacement between frames
//! - Adaptive sampling: dense analysis for fast movement, sparse for holds
//! - Frame gate: one estimator + one sampler, owned per exercise session

pub mod estimator;
pub mod gate;
pub mod sampler;

pub use estimator::*;
pub use gate::*;
pub use sampler::*;
