use std::path::Path;

use crate::shared::constants::{CAMERA_HEIGHT, CAMERA_WIDTH};
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::FrameSource;

/// libavdevice input format used for cameras on this platform.
#[cfg(target_os = "linux")]
const CAMERA_FORMAT: &str = "v4l2";
#[cfg(target_os = "macos")]
const CAMERA_FORMAT: &str = "avfoundation";
#[cfg(target_os = "windows")]
const CAMERA_FORMAT: &str = "dshow";
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const CAMERA_FORMAT: &str = "v4l2";

/// Decodes frames via ffmpeg-next (libavformat + libavcodec), from a video
/// file or a capture device.
///
/// Every decoded frame is converted to RGB24 and wrapped in a [`Frame`].
pub struct FfmpegReader {
    camera: bool,
    state: Option<DecodeState>,
}

struct DecodeState {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    video_stream_index: usize,
    next_sequence: usize,
    flushing: bool,
    done: bool,
}

// Safety: FfmpegReader is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegReader {}

impl FfmpegReader {
    /// Reader for video files.
    pub fn new() -> Self {
        Self {
            camera: false,
            state: None,
        }
    }

    /// Reader for capture devices: `open` takes a device name such as
    /// `/dev/video0` (Linux), `0` (macOS) or `video=<name>` (Windows) and
    /// requests 1280x720.
    pub fn camera() -> Self {
        Self {
            camera: true,
            state: None,
        }
    }

    fn open_input(
        &self,
        path: &Path,
    ) -> Result<ffmpeg_next::format::context::Input, Box<dyn std::error::Error>> {
        if !self.camera {
            return Ok(ffmpeg_next::format::input(path)?);
        }

        ffmpeg_next::device::register_all();
        let format = ffmpeg_next::device::input::video()
            .find(|f| f.name() == CAMERA_FORMAT)
            .ok_or_else(|| format!("capture format '{CAMERA_FORMAT}' not available"))?;

        let mut options = ffmpeg_next::Dictionary::new();
        options.set("video_size", &format!("{CAMERA_WIDTH}x{CAMERA_HEIGHT}"));
        options.set("framerate", "30");

        match ffmpeg_next::format::open_with(
            path,
            &ffmpeg_next::format::format::Format::Input(format),
            options,
        )? {
            ffmpeg_next::format::context::Context::Input(ictx) => Ok(ictx),
            ffmpeg_next::format::context::Context::Output(_) => {
                Err("capture device opened as output".into())
            }
        }
    }
}

impl Default for FfmpegReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for FfmpegReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = self.open_input(path)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let width = decoder.width();
        let height = decoder.height();
        let metadata = VideoMetadata {
            width,
            height,
            fps,
            total_frames: if self.camera { 0 } else { stream.frames().max(0) as usize },
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: if self.camera { None } else { Some(path.to_path_buf()) },
        };

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::info!(
            "Opened {} {}: {width}x{height} @ {fps:.2} fps ({})",
            if self.camera { "camera" } else { "video" },
            path.display(),
            metadata.codec
        );

        self.state = Some(DecodeState {
            ictx,
            decoder,
            scaler,
            width,
            height,
            video_stream_index,
            next_sequence: 0,
            flushing: false,
            done: false,
        });

        Ok(metadata)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let state = self.state.as_mut().ok_or("FfmpegReader: not opened")?;
        state.next_frame()
    }

    fn close(&mut self) {
        self.state = None;
    }
}

impl DecodeState {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.done {
            return Ok(None);
        }

        if let Some(frame) = self.try_receive()? {
            return Ok(Some(frame));
        }

        if self.flushing {
            self.done = true;
            return Ok(None);
        }

        loop {
            let mut packet = ffmpeg_next::Packet::empty();
            match classify_read(packet.read(&mut self.ictx))? {
                PacketRead::Retry => continue,
                PacketRead::EndOfStream => {
                    if let Err(e) = self.decoder.send_eof() {
                        log::debug!("Decoder flush failed: {e}");
                    }
                    self.flushing = true;
                    if let Some(frame) = self.try_receive()? {
                        return Ok(Some(frame));
                    }
                    self.done = true;
                    return Ok(None);
                }
                PacketRead::Packet => {}
            }

            if packet.stream() != self.video_stream_index {
                continue;
            }

            if let Err(e) = self.decoder.send_packet(&packet) {
                log::debug!("Skipping undecodable packet: {e}");
                continue;
            }

            if let Some(frame) = self.try_receive()? {
                return Ok(Some(frame));
            }
        }
    }

    fn try_receive(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(&decoded, &mut rgb_frame)?;

        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, 3, self.next_sequence);
        self.next_sequence += 1;
        Ok(Some(frame))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PacketRead {
    Packet,
    Retry,
    EndOfStream,
}

/// Only `Eof` ends the stream. `EAGAIN` (a live device with nothing ready yet)
/// is retried; any other error, e.g. `ENODEV` from an unplugged camera, is
/// returned so the session can stop.
fn classify_read(
    result: Result<(), ffmpeg_next::Error>,
) -> Result<PacketRead, Box<dyn std::error::Error>> {
    match result {
        Ok(()) => Ok(PacketRead::Packet),
        Err(ffmpeg_next::Error::Eof) => Ok(PacketRead::EndOfStream),
        Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::util::error::EAGAIN => {
            Ok(PacketRead::Retry)
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may have padding bytes at the end of each row (stride > width*3).
pub(crate) fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let row_len = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + row_len]);
    }
    pixels
}
