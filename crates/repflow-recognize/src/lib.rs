//! REPFLOW Recognizers
//!
//! Body configuration as STATE, repetitions as TRANSITIONS.
//!
//! Each exercise has its own finite-state machine. A machine looks at a
//! handful of joints in one frame, decides which posture the body is in, and
//! reports a completed repetition on the transition that closes a cycle:
//!
//! - Squats: Standing -> Squatting -> Standing
//! - Jumping jacks: Closed -> Open -> Closed
//! - Mountain climbers: right knee in, then left knee in
//! - Burpees: Standing -> Crouched -> Plank -> Standing
//! - High knees: one knee driven, then the other
//!
//! Machines never guess: if an inspected joint is not visible the frame is
//! skipped and state is left untouched.

pub mod burpee;
pub mod feedback;
pub mod high_knees;
pub mod jumping_jack;
pub mod mountain_climber;
pub mod recognizer;
pub mod squat;

pub use burpee::*;
pub use feedback::*;
pub use high_knees::*;
pub use jumping_jack::*;
pub use mountain_climber::*;
pub use recognizer::*;
pub use squat::*;
