use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_sink::FrameSink;

const FALLBACK_FPS: i32 = 30;

/// Records frames to a video file via ffmpeg-next (MPEG-4 in any container
/// libavformat can guess from the extension).
///
/// When the session read from a file that has audio, the audio track is
/// remuxed into the recording on close.
pub struct FfmpegWriter {
    state: Option<EncodeState>,
}

struct EncodeState {
    octx: ffmpeg_next::format::context::Output,
    encoder: ffmpeg_next::codec::encoder::video::Encoder,
    scaler: ffmpeg_next::software::scaling::Context,
    output_path: PathBuf,
    source_path: Option<PathBuf>,
    width: u32,
    height: u32,
    fps: i32,
    frame_count: usize,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self { state: None }
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // YUV420P needs even dimensions; odd frames are scaled down by one pixel.
        let enc_w = (metadata.width & !1).max(2);
        let enc_h = (metadata.height & !1).max(2);
        let fps = match metadata.fps.round() as i32 {
            f if f > 0 => f,
            _ => FALLBACK_FPS,
        };

        let mut octx = ffmpeg_next::format::output(path)?;
        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder not found")?;
        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;
        encoder_ctx.set_width(enc_w);
        encoder_ctx.set_height(enc_h);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));
        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);
        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUV420P,
            enc_w,
            enc_h,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::info!(
            "Recording {}x{} @ {fps} fps to {}",
            enc_w,
            enc_h,
            path.display()
        );

        self.state = Some(EncodeState {
            octx,
            encoder,
            scaler,
            output_path: path.to_path_buf(),
            source_path: metadata.source_path.clone(),
            width: metadata.width,
            height: metadata.height,
            fps,
            frame_count: 0,
        });
        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let state = self.state.as_mut().ok_or("FfmpegWriter: not opened")?;
        if frame.width() != state.width || frame.height() != state.height || frame.channels() != 3 {
            return Err(format!(
                "frame {}x{}x{} does not match recording {}x{}x3",
                frame.width(),
                frame.height(),
                frame.channels(),
                state.width,
                state.height
            )
            .into());
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            state.width,
            state.height,
        );
        let stride = rgb_frame.stride(0);
        let row_len = state.width as usize * 3;
        let dst = rgb_frame.data_mut(0);
        for (row, src_row) in frame.data().chunks_exact(row_len).enumerate() {
            dst[row * stride..row * stride + row_len].copy_from_slice(src_row);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        state.scaler.run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(state.frame_count as i64));

        state.encoder.send_frame(&yuv_frame)?;
        state.drain_packets()?;
        state.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(mut state) = self.state.take() else {
            return Ok(());
        };

        state.encoder.send_eof()?;
        state.drain_packets()?;
        state.octx.write_trailer()?;
        log::debug!("Wrote {} frames to {}", state.frame_count, state.output_path.display());

        let EncodeState {
            octx,
            output_path,
            source_path,
            ..
        } = state;
        drop(octx);

        if let Some(source_path) = source_path {
            if let Err(e) = mux_audio(&source_path, &output_path) {
                log::warn!("Audio muxing failed: {e}");
            }
        }
        Ok(())
    }
}

impl EncodeState {
    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let ost_time_base = self
            .octx
            .stream(0)
            .ok_or("FfmpegWriter: output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while self.encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(ffmpeg_next::Rational(1, self.fps), ost_time_base);
            encoded.write_interleaved(&mut self.octx)?;
        }
        Ok(())
    }
}

/// Copies audio from `source` into `video_output` by remuxing through a temp
/// file that then replaces the output. No-op when the source has no audio.
fn mux_audio(source: &Path, video_output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut ictx_source = ffmpeg_next::format::input(source)?;
    if ictx_source
        .streams()
        .best(ffmpeg_next::media::Type::Audio)
        .is_none()
    {
        return Ok(());
    }
    let mut ictx_video = ffmpeg_next::format::input(video_output)?;

    let ext = video_output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("mp4");
    let temp_path = video_output.with_extension(format!("mux.{ext}"));
    let mut octx = ffmpeg_next::format::output(&temp_path)?;

    let video_map = add_copy_streams(&ictx_video, &mut octx, ffmpeg_next::media::Type::Video, 0)?;
    let first_audio = video_map.iter().flatten().count();
    let audio_map = add_copy_streams(
        &ictx_source,
        &mut octx,
        ffmpeg_next::media::Type::Audio,
        first_audio,
    )?;

    octx.write_header()?;
    copy_packets(&mut ictx_video, &mut octx, &video_map)?;
    copy_packets(&mut ictx_source, &mut octx, &audio_map)?;
    octx.write_trailer()?;

    std::fs::rename(&temp_path, video_output)?;
    Ok(())
}

/// Adds a stream-copy output for every input stream of `medium`; returns the
/// input→output index map.
fn add_copy_streams(
    ictx: &ffmpeg_next::format::context::Input,
    octx: &mut ffmpeg_next::format::context::Output,
    medium: ffmpeg_next::media::Type,
    first_index: usize,
) -> Result<Vec<Option<usize>>, Box<dyn std::error::Error>> {
    let mut map = vec![None; ictx.nb_streams() as usize];
    let mut next = first_index;
    for (idx, stream) in ictx.streams().enumerate() {
        if stream.parameters().medium() != medium {
            continue;
        }
        let mut ost = octx.add_stream(ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::None))?;
        ost.set_parameters(stream.parameters());
        // Let the muxer pick a tag valid for the output container.
        unsafe {
            (*ost.parameters().as_mut_ptr()).codec_tag = 0;
        }
        map[idx] = Some(next);
        next += 1;
    }
    Ok(map)
}

fn copy_packets(
    ictx: &mut ffmpeg_next::format::context::Input,
    octx: &mut ffmpeg_next::format::context::Output,
    map: &[Option<usize>],
) -> Result<(), Box<dyn std::error::Error>> {
    let time_bases: Vec<_> = ictx.streams().map(|s| s.time_base()).collect();
    for (stream, mut packet) in ictx.packets() {
        let ist = stream.index();
        let Some(ost) = map.get(ist).copied().flatten() else {
            continue;
        };
        let ost_time_base = octx.stream(ost).ok_or("missing output stream")?.time_base();
        packet.rescale_ts(time_bases[ist], ost_time_base);
        packet.set_position(-1);
        packet.set_stream(ost);
        packet.write_interleaved(octx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::domain::frame_source::FrameSource;
    use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;

    fn metadata(w: u32, h: u32, fps: f64) -> VideoMetadata {
        VideoMetadata {
            width: w,
            height: h,
            fps,
            total_frames: 0,
            codec: String::new(),
            source_path: None,
        }
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 30.0)).unwrap();
        for i in 0..3 {
            writer.write(&Frame::filled(160, 120, &[128, 128, 128], i)).unwrap();
        }
        writer.close().unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_write_without_open_errors() {
        let mut writer = FfmpegWriter::new();
        assert!(writer.write(&Frame::filled(16, 16, &[0, 0, 0], 0)).is_err());
    }

    #[test]
    fn test_write_rejects_size_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FfmpegWriter::new();
        writer
            .open(&dir.path().join("out.mp4"), &metadata(160, 120, 30.0))
            .unwrap();
        assert!(writer.write(&Frame::filled(80, 60, &[0, 0, 0], 0)).is_err());
        writer.close().unwrap();
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FfmpegWriter::new();
        writer
            .open(&dir.path().join("out.mp4"), &metadata(160, 120, 0.0))
            .unwrap();
        writer.write(&Frame::filled(160, 120, &[0, 0, 0], 0)).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_odd_size_is_recorded_at_even_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.mp4");
        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(161, 121, 25.0)).unwrap();
        writer.write(&Frame::filled(161, 121, &[50, 50, 50], 0)).unwrap();
        writer.close().unwrap();

        let mut reader = FfmpegReader::new();
        let meta = reader.open(&path).unwrap();
        assert_eq!((meta.width, meta.height), (160, 120));
    }

    #[test]
    fn test_roundtrip_preserves_brightness() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 30.0)).unwrap();
        for i in 0..3 {
            writer.write(&Frame::filled(160, 120, &[128, 128, 128], i)).unwrap();
        }
        writer.close().unwrap();

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();
        let mut frames = Vec::new();
        while let Some(frame) = reader.next_frame().unwrap() {
            frames.push(frame);
        }
        assert_eq!(frames.len(), 3);

        // Lossy codec: overall brightness should stay close.
        let first = &frames[0];
        let avg = first.data().iter().map(|&b| b as f64).sum::<f64>() / first.data().len() as f64;
        assert!((avg - 128.0).abs() < 40.0, "average {avg} should be close to 128");
    }
}
