//! Landmark sources

use repflow_core::Detection;

/// Supplier of detections in arrival order.
///
/// Pose estimation lives outside this crate; whatever runs the model
/// implements this trait.
pub trait FrameSource {
    /// Next tick, or `None` once the stream has ended
    fn next_detection(&mut self) -> Option<Detection>;
}

impl<F> FrameSource for F
where
    F: FnMut() -> Option<Detection>,
{
    fn next_detection(&mut self) -> Option<Detection> {
        self()
    }
}

/// Source backed by any iterator of detections
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Detection>,
{
    /// Create a new source over `detections`
    pub fn new(detections: impl IntoIterator<IntoIter = I>) -> Self {
        IterSource {
            inner: detections.into_iter(),
        }
    }
}

impl<I> FrameSource for IterSource<I>
where
    I: Iterator<Item = Detection>,
{
    fn next_detection(&mut self) -> Option<Detection> {
        self.inner.next()
    }
}
