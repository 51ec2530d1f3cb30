use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::infrastructure::image_file_writer::ImageFileWriter;

/// Still-image output: keeps the latest frame and saves it on close.
///
/// Used when the source is a single image, so the one processed frame ends up
/// in `path`. With a multi-frame source only the last frame survives.
pub struct ImageFileSink {
    writer: Box<dyn ImageWriter>,
    path: Option<PathBuf>,
    last: Option<Frame>,
}

impl ImageFileSink {
    pub fn new() -> Self {
        Self::with_writer(Box::new(ImageFileWriter::new()))
    }

    pub fn with_writer(writer: Box<dyn ImageWriter>) -> Self {
        Self {
            writer,
            path: None,
            last: None,
        }
    }
}

impl Default for ImageFileSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for ImageFileSink {
    fn open(
        &mut self,
        path: &Path,
        _metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.path = Some(path.to_path_buf());
        self.last = None;
        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if self.path.is_none() {
            return Err("ImageFileSink: not opened".into());
        }
        self.last = Some(frame.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.path.take();
        match (path, self.last.take()) {
            (Some(path), Some(frame)) => {
                self.writer.write(&path, &frame)?;
                log::info!("Saved {}", path.display());
                Ok(())
            }
            (Some(path), None) => {
                log::warn!("No frame to save to {}", path.display());
                Ok(())
            }
            (None, _) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> VideoMetadata {
        VideoMetadata {
            width: 10,
            height: 10,
            fps: 0.0,
            total_frames: 1,
            codec: String::new(),
            source_path: None,
        }
    }

    #[test]
    fn test_saves_last_frame_on_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut sink = ImageFileSink::new();
        sink.open(&path, &metadata()).unwrap();
        sink.write(&Frame::filled(10, 10, &[1, 1, 1], 0)).unwrap();
        sink.write(&Frame::filled(10, 10, &[9, 8, 7], 1)).unwrap();
        assert!(!path.exists());

        sink.close().unwrap();
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(3, 3).0, [9, 8, 7]);
    }

    #[test]
    fn test_close_without_frames_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut sink = ImageFileSink::new();
        sink.open(&path, &metadata()).unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_write_without_open_errors() {
        let mut sink = ImageFileSink::new();
        assert!(sink.write(&Frame::filled(2, 2, &[0, 0, 0], 0)).is_err());
    }
}
