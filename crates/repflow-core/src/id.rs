//! Identity types for REPFLOW
//!
//! Sessions are keyed by a 64-bit identifier handed out by whichever
//! collaborator owns the client connection (HTTP client, CLI run, test).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Session identity - one ordered frame stream with its own rep state
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    /// Reserved id, never handed out by a registry
    pub const ZERO: SessionId = SessionId(0);

    /// Create a new session id
    #[inline]
    pub fn new(id: u64) -> Self {
        SessionId(id)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session({:016x})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
