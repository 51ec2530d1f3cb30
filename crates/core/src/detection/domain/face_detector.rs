use crate::detection::domain::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Returns boxes in the detector's own order; callers must not assume any
/// identity between boxes of consecutive frames. A failed call affects only
/// the frame it was made for.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
