use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::FrameSource;
use crate::video::infrastructure::ffmpeg_reader::extract_rgb_pixels;

/// Presents a still image as a one-frame stream (`fps = 0`,
/// `total_frames = 1`), so photos go through the same session loop as video.
///
/// Decodes with ffmpeg, which is much faster than the `image` crate on large
/// JPEGs.
pub struct ImageFileReader {
    frame: Option<Frame>,
    opened: bool,
}

impl ImageFileReader {
    pub fn new() -> Self {
        Self {
            frame: None,
            opened: false,
        }
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_single_frame(
    ictx: &mut ffmpeg_next::format::context::Input,
    decoder: &mut ffmpeg_next::decoder::Video,
    scaler: &mut ffmpeg_next::software::scaling::Context,
    video_stream_index: usize,
) -> Result<Frame, Box<dyn std::error::Error>> {
    for (stream, packet) in ictx.packets() {
        if stream.index() != video_stream_index {
            continue;
        }
        decoder.send_packet(&packet)?;
        if let Some(frame) = try_receive_frame(decoder, scaler)? {
            return Ok(frame);
        }
    }

    // Some decoders only emit the picture on flush.
    if let Err(e) = decoder.send_eof() {
        log::debug!("Decoder flush failed: {e}");
    }
    try_receive_frame(decoder, scaler)?.ok_or_else(|| "Failed to decode image".into())
}

fn try_receive_frame(
    decoder: &mut ffmpeg_next::decoder::Video,
    scaler: &mut ffmpeg_next::software::scaling::Context,
) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
    let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
    if decoder.receive_frame(&mut decoded).is_err() {
        return Ok(None);
    }
    let (width, height) = (decoder.width(), decoder.height());
    let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
    scaler.run(&decoded, &mut rgb_frame)?;
    let pixels = extract_rgb_pixels(&rgb_frame, width, height);
    Ok(Some(Frame::new(pixels, width, height, 3, 0)))
}

impl FrameSource for ImageFileReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No image data found")?;
        let video_stream_index = stream.index();

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let mut decoder = codec_ctx.decoder().video()?;
        let width = decoder.width();
        let height = decoder.height();

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        let frame = decode_single_frame(&mut ictx, &mut decoder, &mut scaler, video_stream_index)?;
        log::info!("Opened image {}: {width}x{height}", path.display());

        self.frame = Some(frame);
        self.opened = true;
        Ok(VideoMetadata {
            width,
            height,
            fps: 0.0,
            total_frames: 1,
            codec: String::new(),
            source_path: Some(path.to_path_buf()),
        })
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if !self.opened {
            return Err("ImageFileReader: not opened".into());
        }
        Ok(self.frame.take())
    }

    fn close(&mut self) {
        self.frame = None;
        self.opened = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_test_image(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("test.png");
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([50, 100, 200]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_open_returns_still_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 80);
        let mut reader = ImageFileReader::new();
        let meta = reader.open(&path).unwrap();
        assert_eq!((meta.width, meta.height), (100, 80));
        assert_eq!(meta.fps, 0.0);
        assert_eq!(meta.total_frames, 1);
        assert_eq!(meta.source_path, Some(path));
    }

    #[test]
    fn test_open_nonexistent_errors() {
        let mut reader = ImageFileReader::new();
        assert!(reader.open(Path::new("/nonexistent/test.png")).is_err());
    }

    #[test]
    fn test_yields_one_rgb_frame_then_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 80);
        let mut reader = ImageFileReader::new();
        reader.open(&path).unwrap();

        let frame = reader.next_frame().unwrap().unwrap();
        assert_eq!(frame.sequence(), 0);
        assert_eq!(frame.channels(), 3);
        assert_eq!((frame.width(), frame.height()), (100, 80));
        assert_eq!(frame.pixel(0, 0), &[50, 100, 200]);

        assert!(reader.next_frame().unwrap().is_none());
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_next_frame_without_open_errors() {
        let mut reader = ImageFileReader::new();
        assert!(reader.next_frame().is_err());
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 10, 10);
        let mut reader = ImageFileReader::new();
        reader.open(&path).unwrap();
        reader.close();
        reader.close();
        assert!(reader.next_frame().is_err());
    }
}
