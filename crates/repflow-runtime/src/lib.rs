//! REPFLOW Runtime - Session orchestration
//!
//! Per frame, for one client stream:
//! 1. Resolve the exercise (unknown names are rejected untouched)
//! 2. Swap in a fresh session if the exercise changed
//! 3. Estimate motion against the session's previous frame
//! 4. Gate the frame through the adaptive sampler
//! 5. Run the exercise recognizer on admitted frames
//! 6. Report rep delta, feedback and pose confidence
//!
//! Around that loop sit a registry for many concurrent streams, a
//! [`FrameSource`] seam for whatever produces landmarks, a workout driver
//! and tracing setup.

pub mod config;
pub mod dispatcher;
pub mod logging;
pub mod registry;
pub mod session;
pub mod source;
pub mod workout;

pub use config::*;
pub use dispatcher::*;
pub use logging::{init_tracing, LogFormat};
pub use registry::*;
pub use session::*;
pub use source::*;
pub use workout::*;
