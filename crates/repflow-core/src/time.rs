//! Time primitives for REPFLOW
//!
//! Frames carry the instant they were sampled, relative to the start of the
//! stream. The pipeline itself only relies on arrival order.

use std::ops::Add;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Frame time - microseconds since stream start
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct FrameTime(pub i64);

impl FrameTime {
    /// Start of the stream
    pub const ZERO: FrameTime = FrameTime(0);

    /// Frame time from milliseconds since stream start
    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        FrameTime(millis * 1000)
    }

    /// Whole milliseconds since stream start
    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }
}

impl Add<Duration> for FrameTime {
    type Output = FrameTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        FrameTime(self.0 + rhs.as_micros() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time_units() {
        let t = FrameTime::from_millis(1500);
        assert_eq!(t.0, 1_500_000);
        assert_eq!(t.as_millis(), 1500);
    }

    #[test]
    fn test_frame_time_advances_by_duration() {
        let t = FrameTime::from_millis(100) + Duration::from_micros(33_333);
        assert_eq!(t, FrameTime(133_333));
        assert_eq!(t.as_millis(), 133);
    }
}
