//! YOLO face detector using ONNX Runtime via `ort`.
//!
//! Letterbox preprocessing, single inference, greedy NMS. Boxes are returned
//! in descending confidence order; no tracking across frames.

use std::path::Path;

use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;

/// Fallback model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

const NMS_IOU_THRESH: f64 = 0.45;

/// Letterbox fill value (YOLO convention).
const PAD_VALUE: f32 = 114.0 / 255.0;

pub struct OnnxYoloDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxYoloDetector {
    /// Loads the model; the square input size is read from its NCHW input
    /// shape, falling back to 640 for dynamic shapes.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| match input.dtype() {
                ort::value::ValueType::Tensor { ref shape, .. }
                    if shape.len() >= 4 && shape[2] > 0 =>
                {
                    Some(shape[2] as u32)
                }
                _ => None,
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::info!(
            "Loaded face model {} (input {input_size}px, confidence {confidence})",
            model_path.display()
        );

        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl FaceDetector for OnnxYoloDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }
        let letterboxed = letterbox(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(letterboxed.tensor.clone())?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("face model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        if shape.len() != 3 {
            return Err(format!("unexpected face model output shape: {shape:?}").into());
        }

        // Output is [1, features, boxes] (transposed) or [1, boxes, features].
        let transposed = shape[1] < shape[2];
        let (num_boxes, num_feats) = if transposed {
            (shape[2], shape[1])
        } else {
            (shape[1], shape[2])
        };
        if num_feats < 5 {
            return Err(format!("face model rows too short: {num_feats} features").into());
        }
        let data = tensor.as_slice().ok_or("face model output is not contiguous")?;
        let feature = |i: usize, f: usize| {
            if transposed {
                data[f * num_boxes + i]
            } else {
                data[i * num_feats + f]
            }
        };

        let mut candidates = Vec::new();
        for i in 0..num_boxes {
            // Row layout: [cx, cy, w, h, conf, ...keypoints]
            let conf = feature(i, 4) as f64;
            if conf < self.confidence {
                continue;
            }
            let (cx, cy) = (feature(i, 0) as f64, feature(i, 1) as f64);
            let (w, h) = (feature(i, 2) as f64, feature(i, 3) as f64);
            candidates.push(Candidate {
                bbox: [
                    letterboxed.to_frame_x(cx - w / 2.0),
                    letterboxed.to_frame_y(cy - h / 2.0),
                    letterboxed.to_frame_x(cx + w / 2.0),
                    letterboxed.to_frame_y(cy + h / 2.0),
                ],
                confidence: conf,
            });
        }

        let kept = nms(&mut candidates, NMS_IOU_THRESH);
        log::debug!(
            "Frame {}: {} candidates, {} after NMS",
            frame.sequence(),
            candidates.len(),
            kept.len()
        );

        Ok(kept
            .iter()
            .map(|c| Detection::from_corners(c.bbox[0], c.bbox[1], c.bbox[2], c.bbox[3], c.confidence as f32))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

struct Letterboxed {
    tensor: ndarray::Array4<f32>,
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

impl Letterboxed {
    fn to_frame_x(&self, x: f64) -> f64 {
        (x - self.pad_x as f64) / self.scale
    }

    fn to_frame_y(&self, y: f64) -> f64 {
        (y - self.pad_y as f64) / self.scale
    }
}

/// Aspect-preserving resize into a `target_size`² NCHW float tensor,
/// centred on a grey background.
fn letterbox(frame: &Frame, target_size: u32) -> Letterboxed {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let size = target_size as usize;
    let mut tensor = ndarray::Array4::<f32>::from_elem((1, 3, size, size), PAD_VALUE);

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let channels = frame.channels() as usize;

    // Nearest-neighbour sampling; grey frames feed the same value to all planes.
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            for c in 0..3 {
                let value = src[[src_y, src_x, c.min(channels - 1)]];
                tensor[[0, c, pad_y as usize + y, pad_x as usize + x]] = value as f32 / 255.0;
            }
        }
    }

    Letterboxed {
        tensor,
        scale,
        pad_x,
        pad_y,
    }
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct Candidate {
    bbox: [f64; 4],
    confidence: f64,
}

/// Greedy NMS: sort by confidence descending, suppress overlapping boxes.
fn nms(candidates: &mut [Candidate], iou_thresh: f64) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<Candidate> = Vec::new();
    for c in candidates.iter() {
        if keep.iter().all(|k| bbox_iou(&k.bbox, &c.bbox) <= iou_thresh) {
            keep.push(c.clone());
        }
    }
    keep
}

/// IoU of two `[x1, y1, x2, y2]` boxes.
fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}
