use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::compositing::domain::display_layout::DisplayLayout;
use crate::compositing::infrastructure::frame_compositor::FrameCompositor;
use crate::compositing::infrastructure::overlay::{draw_help_panel, draw_info_panel, InfoPanel};
use crate::control::domain::control_input::{ControlInput, NoControlInput};
use crate::control::domain::session_context::SessionContext;
use crate::effects::domain::effect_state::EffectState;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::infrastructure::image_file_writer::ImageFileWriter;

use super::frame_orchestrator::{elapsed_ms, FrameOrchestrator};
use super::frame_rate::FrameRateCounter;
use super::session_config::SessionConfig;
use super::session_error::SessionError;
use super::session_logger::{SessionLogger, StdoutSessionLogger};

/// Why the frame loop ended without an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StopReason {
    #[default]
    EndOfStream,
    Quit,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionReport {
    pub frames: usize,
    pub faces_total: usize,
    pub detection_failures: usize,
    pub screenshots: Vec<PathBuf>,
    pub stop_reason: StopReason,
}

struct SinkSlot {
    sink: Box<dyn FrameSink>,
    path: PathBuf,
    opened: bool,
}

/// One run of the frame loop, from opening the source to closing the sink.
///
/// Per frame: drain control input, snapshot the effect state, pull a frame,
/// detect and apply effects, compose the output and hand it to the sink.
/// Input arriving while frame N is processed therefore shows from frame N+1.
///
/// The sink is opened lazily with the size of the first composed frame, which
/// differs from the source size in side-by-side layouts. Source and sink are
/// closed on every exit path.
pub struct Session {
    source: Box<dyn FrameSource>,
    sink: Option<SinkSlot>,
    orchestrator: FrameOrchestrator,
    compositor: FrameCompositor,
    input: Box<dyn ControlInput>,
    screenshot_writer: Box<dyn ImageWriter>,
    logger: Box<dyn SessionLogger>,
    config: SessionConfig,
}

impl Session {
    pub fn new(
        source: Box<dyn FrameSource>,
        orchestrator: FrameOrchestrator,
        config: SessionConfig,
    ) -> Self {
        Self {
            source,
            sink: None,
            orchestrator,
            compositor: FrameCompositor::new(config.layout),
            input: Box::new(NoControlInput),
            screenshot_writer: Box::new(ImageFileWriter::new()),
            logger: Box::new(StdoutSessionLogger::new(config.progress_every)),
            config,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn FrameSink>, path: impl Into<PathBuf>) -> Self {
        self.sink = Some(SinkSlot {
            sink,
            path: path.into(),
            opened: false,
        });
        self
    }

    pub fn with_input(mut self, input: Box<dyn ControlInput>) -> Self {
        self.input = input;
        self
    }

    pub fn with_screenshot_writer(mut self, writer: Box<dyn ImageWriter>) -> Self {
        self.screenshot_writer = writer;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn SessionLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn run(mut self, path: &Path) -> Result<SessionReport, SessionError> {
        let metadata = match self.source.open(path) {
            Ok(m) => m,
            Err(source) => {
                self.source.close();
                return Err(SessionError::SourceOpen {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if metadata.is_live() {
            log::info!("Live source, press q to stop");
        } else {
            log::info!("Processing {} frames", metadata.total_frames);
        }

        let started = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut report = SessionReport::default();
        let result = self.run_frames(&metadata, &started, &mut report);

        self.source.close();
        let closed = self.close_sink();
        self.logger.summary();

        match result {
            Ok(reason) => {
                closed?;
                report.stop_reason = reason;
                log::info!(
                    "Session finished ({reason:?}): {} frames, {} faces anonymized",
                    report.frames,
                    report.faces_total
                );
                Ok(report)
            }
            Err(e) => {
                if let Err(close_err) = closed {
                    log::warn!("{close_err} after error: {e}");
                }
                Err(e)
            }
        }
    }

    fn run_frames(
        &mut self,
        metadata: &VideoMetadata,
        started: &str,
        report: &mut SessionReport,
    ) -> Result<StopReason, SessionError> {
        let mut context = SessionContext::new(self.config.initial_state);
        let mut rate = FrameRateCounter::default();
        let mut last_composed: Option<Frame> = None;

        loop {
            if context.poll_input(self.input.as_mut()) > 0 {
                self.save_screenshot(last_composed.as_ref(), started, report);
            }
            if context.is_stopped() {
                return Ok(StopReason::Quit);
            }

            let state = context.snapshot();
            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => return Ok(StopReason::EndOfStream),
                Err(source) => {
                    return Err(SessionError::SourceRead {
                        frames: report.frames,
                        source,
                    })
                }
            };

            let processed = self.orchestrator.process(frame, &state, self.logger.as_mut());
            if processed.detection_failed {
                report.detection_failures += 1;
            }
            report.faces_total += processed.faces;

            let t0 = Instant::now();
            let mut composed = self
                .compositor
                .compose(&processed.frames, &state, processed.faces);
            let fps = rate.tick();
            self.draw_overlays(&mut composed, fps, processed.faces, &state);
            self.logger.timing("compose", elapsed_ms(t0));

            self.write(&composed, metadata)?;

            report.frames += 1;
            self.logger.metric("faces", processed.faces as f64);
            self.logger.progress(report.frames, metadata.total_frames);
            last_composed = Some(composed);
        }
    }

    fn draw_overlays(&self, frame: &mut Frame, fps: f64, faces: usize, state: &EffectState) {
        if self.config.show_info && self.config.layout == DisplayLayout::Single {
            draw_info_panel(
                frame,
                &InfoPanel {
                    fps,
                    faces,
                    state: *state,
                },
            );
        }
        if state.help_visible {
            draw_help_panel(frame);
        }
    }

    fn write(&mut self, frame: &Frame, metadata: &VideoMetadata) -> Result<(), SessionError> {
        let Some(slot) = self.sink.as_mut() else {
            return Ok(());
        };

        let t0 = Instant::now();
        if !slot.opened {
            let output_meta = metadata.with_size(frame.width(), frame.height());
            slot.sink
                .open(&slot.path, &output_meta)
                .map_err(|source| SessionError::SinkOpen {
                    path: slot.path.clone(),
                    source,
                })?;
            slot.opened = true;
        }
        slot.sink
            .write(frame)
            .map_err(|source| SessionError::SinkWrite {
                sequence: frame.sequence(),
                source,
            })?;
        self.logger.timing("write", elapsed_ms(t0));
        Ok(())
    }

    fn close_sink(&mut self) -> Result<(), SessionError> {
        match self.sink.as_mut() {
            Some(slot) => {
                slot.opened = false;
                slot.sink
                    .close()
                    .map_err(|source| SessionError::SinkClose { source })
            }
            None => Ok(()),
        }
    }

    fn save_screenshot(&self, frame: Option<&Frame>, started: &str, report: &mut SessionReport) {
        let Some(frame) = frame else {
            log::warn!("Screenshot requested before the first frame, skipping");
            return;
        };
        let path = self
            .config
            .screenshot_dir
            .join(format!("screenshot_{started}_{}.png", frame.sequence()));
        match self.screenshot_writer.write(&path, frame) {
            Ok(()) => {
                log::info!("Screenshot saved to {}", path.display());
                report.screenshots.push(path);
            }
            Err(e) => log::warn!("Failed to save screenshot {}: {e}", path.display()),
        }
    }
}
