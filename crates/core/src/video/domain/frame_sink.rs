use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Destination for finished frames (recording file or still image).
///
/// Frames are written strictly one at a time, in order.
pub trait FrameSink: Send {
    /// `metadata` carries the size of the frames that will be written, which
    /// may differ from the source (e.g. side-by-side output).
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes buffered output and releases the destination.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
