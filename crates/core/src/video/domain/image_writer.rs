use std::path::Path;

use crate::shared::frame::Frame;

/// Writes a single frame to an image file (still output and screenshots).
pub trait ImageWriter: Send {
    /// Format follows the extension of `path`. Missing parent directories
    /// are created.
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
