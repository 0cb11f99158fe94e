//! Pose landmarks - body keypoints as delivered by the pose model
//!
//! Coordinates are normalized to the image: x grows rightward, y grows
//! downward, both nominally in 0..1. `z` is relative depth and is carried
//! through untouched; nothing in the rep-counting layer reads it.

use serde::{Deserialize, Serialize};

/// Anatomical landmark index (MediaPipe Pose topology, 33 points)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    /// Number of landmarks in a frame
    pub const COUNT: usize = 33;

    /// All landmarks in index order
    pub fn all() -> &'static [PoseLandmark; PoseLandmark::COUNT] {
        use PoseLandmark::*;
        &[
            Nose,
            LeftEyeInner,
            LeftEye,
            LeftEyeOuter,
            RightEyeInner,
            RightEye,
            RightEyeOuter,
            LeftEar,
            RightEar,
            MouthLeft,
            MouthRight,
            LeftShoulder,
            RightShoulder,
            LeftElbow,
            RightElbow,
            LeftWrist,
            RightWrist,
            LeftPinky,
            RightPinky,
            LeftIndex,
            RightIndex,
            LeftThumb,
            RightThumb,
            LeftHip,
            RightHip,
            LeftKnee,
            RightKnee,
            LeftAnkle,
            RightAnkle,
            LeftHeel,
            RightHeel,
            LeftFootIndex,
            RightFootIndex,
        ]
    }

    /// Position of this landmark in a frame
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A single body keypoint
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 at the left edge
    pub x: f32,
    /// Vertical position, 0 at the top edge
    pub y: f32,
    /// Relative depth
    pub z: f32,
    /// Detection confidence in [0, 1]
    pub visibility: f32,
}

impl Landmark {
    /// Create a new landmark
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// Fully visible landmark on the image plane
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }

    /// Image-plane distance to another landmark (z ignored)
    #[inline]
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Are the coordinates usable at all?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Visible at or above `min_visibility` with finite coordinates
    #[inline]
    pub fn is_visible(&self, min_visibility: f32) -> bool {
        self.is_finite() && self.visibility >= min_visibility
    }
}
