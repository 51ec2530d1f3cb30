use crate::shared::region::Region;

/// A candidate face bounding box as reported by a detector.
///
/// Coordinates are pixels in the frame that produced it and may extend past
/// the frame edges (or be negative); [`Detection::clamp`] turns it into a
/// [`Region`] that is safe to hand to the effect engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f32,
}

impl Detection {
    pub fn new(x: i32, y: i32, width: i32, height: i32, confidence: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
        }
    }

    /// Builds a detection from corner coordinates `(x1, y1)`–`(x2, y2)`.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f32) -> Self {
        let x = x1.floor() as i32;
        let y = y1.floor() as i32;
        Self::new(
            x,
            y,
            x2.ceil() as i32 - x,
            y2.ceil() as i32 - y,
            confidence,
        )
    }

    /// Intersects the box with a `frame_w` × `frame_h` frame.
    ///
    /// Returns `None` when nothing of the box survives (zero clamped width or
    /// height), including boxes with negative size or lying fully outside.
    pub fn clamp(&self, frame_w: u32, frame_h: u32) -> Option<Region> {
        let x1 = (self.x as i64).clamp(0, frame_w as i64);
        let y1 = (self.y as i64).clamp(0, frame_h as i64);
        let x2 = (self.x as i64 + self.width as i64).clamp(0, frame_w as i64);
        let y2 = (self.y as i64 + self.height as i64).clamp(0, frame_h as i64);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Region::new(
            x1 as u32,
            y1 as u32,
            (x2 - x1) as u32,
            (y2 - y1) as u32,
        ))
    }
}

/// Clamps every detection to the frame, dropping degenerate ones.
///
/// Order is preserved: effects are applied in the order the detector
/// returned boxes.
pub fn clamp_all(detections: &[Detection], frame_w: u32, frame_h: u32) -> Vec<Region> {
    detections
        .iter()
        .filter_map(|d| {
            let region = d.clamp(frame_w, frame_h);
            if region.is_none() {
                log::debug!("Dropping degenerate detection {d:?}");
            }
            region
        })
        .collect()
}
