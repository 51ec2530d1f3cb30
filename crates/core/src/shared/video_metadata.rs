use std::path::PathBuf;

/// Stream properties reported by a frame source when it is opened.
///
/// Live camera streams report `total_frames = 0` (unknown length); still
/// images are a single frame with `fps = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Same stream, different frame dimensions (used when the composed
    /// output is larger than the source, e.g. side-by-side demos).
    pub fn with_size(&self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    pub fn is_live(&self) -> bool {
        self.total_frames == 0
    }
}
