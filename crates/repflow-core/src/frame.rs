//! Frames - one timestamped pose snapshot

use crate::{FrameTime, Landmark, PoseLandmark, RepflowError, RepflowResult};

/// Floats per landmark in a flat buffer: x, y, z, visibility
pub const FLOATS_PER_LANDMARK: usize = 4;

/// The full 33-landmark pose for one sampling instant.
///
/// A `Frame` always holds exactly [`PoseLandmark::COUNT`] landmarks; every
/// fallible constructor rejects other shapes with `InvalidFrame`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    timestamp: FrameTime,
    landmarks: [Landmark; PoseLandmark::COUNT],
}

impl Frame {
    /// Build a frame from a landmark slice
    pub fn new(timestamp: FrameTime, landmarks: &[Landmark]) -> RepflowResult<Self> {
        let landmarks: [Landmark; PoseLandmark::COUNT] =
            landmarks
                .try_into()
                .map_err(|_| RepflowError::InvalidFrame {
                    expected: PoseLandmark::COUNT,
                    actual: landmarks.len(),
                })?;
        Ok(Self::from_array(timestamp, landmarks))
    }

    /// Build a frame from an array that already has the right shape
    pub fn from_array(timestamp: FrameTime, landmarks: [Landmark; PoseLandmark::COUNT]) -> Self {
        Self {
            timestamp,
            landmarks,
        }
    }

    /// Build a frame from a flat `[x, y, z, visibility] * 33` buffer
    pub fn from_flat(timestamp: FrameTime, data: &[f32]) -> RepflowResult<Self> {
        if data.len() != PoseLandmark::COUNT * FLOATS_PER_LANDMARK {
            return Err(RepflowError::InvalidFrameBuffer {
                expected: PoseLandmark::COUNT * FLOATS_PER_LANDMARK,
                actual: data.len(),
            });
        }

        let mut landmarks = [Landmark::default(); PoseLandmark::COUNT];
        for (slot, chunk) in landmarks
            .iter_mut()
            .zip(data.chunks_exact(FLOATS_PER_LANDMARK))
        {
            *slot = Landmark::new(chunk[0], chunk[1], chunk[2], chunk[3]);
        }
        Ok(Self::from_array(timestamp, landmarks))
    }

    /// Time the frame was sampled
    #[inline]
    pub fn timestamp(&self) -> FrameTime {
        self.timestamp
    }

    /// All 33 landmarks in index order
    #[inline]
    pub fn landmarks(&self) -> &[Landmark; PoseLandmark::COUNT] {
        &self.landmarks
    }

    /// Get a landmark by anatomical name
    #[inline]
    pub fn landmark(&self, which: PoseLandmark) -> &Landmark {
        &self.landmarks[which.index()]
    }

    /// Mean visibility over a subset of landmarks (0.0 for an empty subset)
    pub fn mean_visibility(&self, subset: &[PoseLandmark]) -> f32 {
        if subset.is_empty() {
            return 0.0;
        }
        let sum: f32 = subset.iter().map(|lm| self.landmark(*lm).visibility).sum();
        sum / subset.len() as f32
    }

    /// First landmark of `required` that is below `min_visibility`
    pub fn require_visible(
        &self,
        required: &[PoseLandmark],
        min_visibility: f32,
    ) -> RepflowResult<()> {
        match required
            .iter()
            .find(|lm| !self.landmark(**lm).is_visible(min_visibility))
        {
            Some(lm) => Err(RepflowError::MissingLandmarkVisibility {
                landmark: *lm,
                visibility: self.landmark(*lm).visibility,
            }),
            None => Ok(()),
        }
    }
}

/// Frame builder
///
/// Starts from every landmark fully visible at the image centre.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    frame: Frame,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    /// Create a new builder with every landmark at the image centre (0.5, 0.5)
    pub fn new() -> Self {
        FrameBuilder {
            frame: Frame::from_array(
                FrameTime::ZERO,
                [Landmark::at(0.5, 0.5); PoseLandmark::COUNT],
            ),
        }
    }

    /// Start from an existing frame
    pub fn from_frame(frame: &Frame) -> Self {
        FrameBuilder {
            frame: frame.clone(),
        }
    }

    /// Set the frame timestamp
    pub fn timestamp(mut self, timestamp: FrameTime) -> Self {
        self.frame.timestamp = timestamp;
        self
    }

    /// Place a landmark on the image plane, keeping its depth and visibility
    pub fn at(mut self, which: PoseLandmark, x: f32, y: f32) -> Self {
        let lm = &mut self.frame.landmarks[which.index()];
        lm.x = x;
        lm.y = y;
        self
    }

    /// Override one landmark's visibility
    pub fn visibility(mut self, which: PoseLandmark, visibility: f32) -> Self {
        self.frame.landmarks[which.index()].visibility = visibility;
        self
    }

    /// Same visibility on every landmark
    pub fn visibility_all(mut self, visibility: f32) -> Self {
        for lm in self.frame.landmarks.iter_mut() {
            lm.visibility = visibility;
        }
        self
    }

    /// Replace one landmark outright
    pub fn landmark(mut self, which: PoseLandmark, landmark: Landmark) -> Self {
        self.frame.landmarks[which.index()] = landmark;
        self
    }

    /// Shift every landmark by the same offset
    pub fn translate(mut self, dx: f32, dy: f32) -> Self {
        for lm in self.frame.landmarks.iter_mut() {
            lm.x += dx;
            lm.y += dy;
        }
        self
    }

    /// Finish the frame
    pub fn build(self) -> Frame {
        self.frame
    }
}

/// One tick of the landmark source
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// A body was found
    Pose(Frame),
    /// The model produced no detection for this tick
    Lost,
}

impl Detection {
    /// The frame, unless the pose was lost
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Detection::Pose(frame) => Some(frame),
            Detection::Lost => None,
        }
    }

    /// No detection this tick
    pub fn is_lost(&self) -> bool {
        matches!(self, Detection::Lost)
    }
}

impl From<Frame> for Detection {
    fn from(frame: Frame) -> Self {
        Detection::Pose(frame)
    }
}

impl From<Option<Frame>> for Detection {
    fn from(frame: Option<Frame>) -> Self {
        frame.map_or(Detection::Lost, Detection::Pose)
    }
}
