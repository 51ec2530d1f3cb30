use crate::shared::frame::Frame;

/// Height of the demo title bar in pixels.
pub const TITLE_BAR_HEIGHT: u32 = 64;

/// How the original and processed frames are arranged for output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayLayout {
    /// Processed frame only (or split view while it is toggled on).
    #[default]
    Single,
    /// Original and processed next to each other, optionally under a title bar.
    SideBySide { title_bar: bool },
}

/// The two frames a comparison output is built from. Lives for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparisonFrame {
    pub original: Frame,
    pub processed: Frame,
}

impl DisplayLayout {
    /// Output dimensions for the given input frame sizes.
    ///
    /// Side by side never crops: the width is the sum of both inputs and the
    /// height is the taller of the two, plus the title bar when present.
    pub fn output_size(&self, original: (u32, u32), processed: (u32, u32)) -> (u32, u32) {
        match *self {
            DisplayLayout::Single => processed,
            DisplayLayout::SideBySide { title_bar } => {
                let bar = if title_bar { TITLE_BAR_HEIGHT } else { 0 };
                (original.0 + processed.0, original.1.max(processed.1) + bar)
            }
        }
    }
}
