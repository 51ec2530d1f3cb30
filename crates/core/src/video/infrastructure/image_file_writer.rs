use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes a single frame to an image file using the `image` crate.
///
/// RGB and single-channel (grey) frames are supported.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let (w, h, data) = (frame.width(), frame.height(), frame.data().to_vec());
        match frame.channels() {
            3 => image::RgbImage::from_raw(w, h, data)
                .ok_or("Failed to create image from frame data")?
                .save(path)?,
            1 => image::GrayImage::from_raw(w, h, data)
                .ok_or("Failed to create image from frame data")?
                .save(path)?,
            n => return Err(format!("Unsupported channel count: {n}").into()),
        }
        log::debug!("Saved {}x{} image to {}", w, h, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shots").join("out.png");
        let frame = Frame::filled(100, 80, &[50, 100, 200], 0);
        ImageFileWriter::new().write(&path, &frame).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let frame = Frame::filled(50, 50, &[50, 100, 200], 0);
        ImageFileWriter::new().write(&path, &frame).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!((img.width(), img.height()), (50, 50));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_writes_grey_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grey.png");
        let frame = Frame::filled(20, 10, &[77], 0);
        ImageFileWriter::new().write(&path, &frame).unwrap();

        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!(img.get_pixel(5, 5).0, [77]);
    }

    #[test]
    fn test_rejects_unsupported_channels() {
        let dir = tempfile::tempdir().unwrap();
        let frame = Frame::filled(4, 4, &[1, 2], 0);
        assert!(ImageFileWriter::new()
            .write(&dir.path().join("x.png"), &frame)
            .is_err());
    }

    #[test]
    fn test_parent_that_is_a_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let frame = Frame::filled(10, 10, &[0, 0, 0], 0);
        assert!(ImageFileWriter::new()
            .write(&blocker.join("out.png"), &frame)
            .is_err());
    }
}
