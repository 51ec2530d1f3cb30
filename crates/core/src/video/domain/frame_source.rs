use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Pull-based source of frames: a camera, a video file or a single image.
///
/// Frames come out with consecutive sequence numbers starting at 0.
pub trait FrameSource: Send {
    /// Opens the source (file path or capture device) and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Blocks until the next frame is available. `Ok(None)` marks the end of
    /// the stream; an error means the source can no longer be read.
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the underlying handle. Safe to call more than once.
    fn close(&mut self);
}
