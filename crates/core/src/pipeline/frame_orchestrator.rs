use std::time::Instant;

use crate::compositing::domain::display_layout::ComparisonFrame;
use crate::detection::domain::detection::clamp_all;
use crate::detection::domain::face_detector::FaceDetector;
use crate::effects::domain::effect_engine::EffectEngine;
use crate::effects::domain::effect_state::EffectState;
use crate::shared::frame::Frame;

use super::session_logger::SessionLogger;

/// Result of running detection and effects on one frame.
#[derive(Debug)]
pub struct ProcessedFrame {
    pub frames: ComparisonFrame,
    /// Regions that were anonymized (after clamping).
    pub faces: usize,
    /// The detector failed and the frame was passed through untouched.
    pub detection_failed: bool,
}

/// Detect → clamp → apply the effect to each region.
///
/// The original frame is kept as-is for split view and side-by-side output;
/// effects are written into a copy.
pub struct FrameOrchestrator {
    detector: Box<dyn FaceDetector>,
    engine: Box<dyn EffectEngine>,
}

impl FrameOrchestrator {
    pub fn new(detector: Box<dyn FaceDetector>, engine: Box<dyn EffectEngine>) -> Self {
        Self { detector, engine }
    }

    pub fn process(
        &mut self,
        frame: Frame,
        state: &EffectState,
        logger: &mut dyn SessionLogger,
    ) -> ProcessedFrame {
        let t0 = Instant::now();
        let detections = match self.detector.detect(&frame) {
            Ok(d) => d,
            Err(e) => {
                log::warn!(
                    "Detection failed on frame {}, passing it through: {e}",
                    frame.sequence()
                );
                logger.timing("detect", elapsed_ms(t0));
                let processed = frame.clone();
                return ProcessedFrame {
                    frames: ComparisonFrame {
                        original: frame,
                        processed,
                    },
                    faces: 0,
                    detection_failed: true,
                };
            }
        };
        logger.timing("detect", elapsed_ms(t0));

        let t1 = Instant::now();
        let regions = clamp_all(&detections, frame.width(), frame.height());
        let mut processed = frame.clone();
        for region in &regions {
            self.engine.apply(&mut processed, *region, state);
        }
        logger.timing("effects", elapsed_ms(t1));
        log::debug!(
            "Frame {}: {} detections, {} regions",
            frame.sequence(),
            detections.len(),
            regions.len()
        );

        ProcessedFrame {
            frames: ComparisonFrame {
                original: frame,
                processed,
            },
            faces: regions.len(),
            detection_failed: false,
        }
    }
}

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
