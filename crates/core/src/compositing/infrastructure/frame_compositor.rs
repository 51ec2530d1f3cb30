use crate::compositing::domain::display_layout::{ComparisonFrame, DisplayLayout, TITLE_BAR_HEIGHT};
use crate::compositing::infrastructure::bitmap_font::{draw_text, text_height};
use crate::compositing::infrastructure::drawing::{blend_rect, blit, fill_rect};
use crate::effects::domain::effect_state::EffectState;
use crate::shared::frame::Frame;

pub const TITLE: &str = "FACE PRIVACY PROTECTION";
pub const SUBTITLE: &str = "REAL-TIME FACE ANONYMIZATION";

const TITLE_BACKGROUND: [u8; 3] = [20, 20, 20];
const TITLE_COLOR: [u8; 3] = [255, 255, 0];
const SUBTITLE_COLOR: [u8; 3] = [200, 200, 200];
const ORIGINAL_LABEL_COLOR: [u8; 3] = [255, 255, 255];
const PROTECTED_LABEL_COLOR: [u8; 3] = [255, 255, 0];
const CAPTION_COLOR: [u8; 3] = [0, 255, 0];

const LABEL_SCALE: u32 = 2;
const LABEL_OFFSET: (i64, i64) = (10, 8);
const LABEL_STRIP_HEIGHT: i64 = 30;
const LABEL_STRIP_ALPHA: f32 = 0.7;

/// Builds the frame that goes to the sink/display from an original and its
/// processed counterpart.
pub struct FrameCompositor {
    layout: DisplayLayout,
}

impl FrameCompositor {
    pub fn new(layout: DisplayLayout) -> Self {
        Self { layout }
    }

    pub fn compose(&self, frames: &ComparisonFrame, state: &EffectState, faces: usize) -> Frame {
        match self.layout {
            DisplayLayout::Single if state.split_view => split_view(&frames.original, &frames.processed),
            DisplayLayout::Single => frames.processed.clone(),
            DisplayLayout::SideBySide { title_bar } => {
                side_by_side(&frames.original, &frames.processed, title_bar, faces)
            }
        }
    }
}

/// Left half from `original`, right half from `processed`. Columns `x < w/2`
/// come from the original.
///
/// Both frames must have the same size; otherwise `processed` is returned
/// unchanged.
pub fn split_view(original: &Frame, processed: &Frame) -> Frame {
    if original.width() != processed.width()
        || original.height() != processed.height()
        || original.channels() != processed.channels()
    {
        log::warn!(
            "Split view needs equal frames, got {}x{} and {}x{}",
            original.width(),
            original.height(),
            processed.width(),
            processed.height()
        );
        return processed.clone();
    }

    let mut out = processed.clone();
    let channels = original.channels() as usize;
    let row_len = original.width() as usize * channels;
    let left_len = (original.width() / 2) as usize * channels;
    let src = original.data();
    let dst = out.data_mut();
    for row in 0..original.height() as usize {
        let start = row * row_len;
        dst[start..start + left_len].copy_from_slice(&src[start..start + left_len]);
    }
    out
}

/// Original on the left, processed on the right, each labelled. The shorter
/// frame is centred vertically on black padding; nothing is cropped.
pub fn side_by_side(original: &Frame, processed: &Frame, title_bar: bool, faces: usize) -> Frame {
    let layout = DisplayLayout::SideBySide { title_bar };
    let (width, height) = layout.output_size(
        (original.width(), original.height()),
        (processed.width(), processed.height()),
    );
    let top = if title_bar { TITLE_BAR_HEIGHT } else { 0 };
    let panel_height = height - top;

    let black = vec![0u8; original.channels() as usize];
    let mut out = Frame::filled(width, height, &black, processed.sequence());

    let original_y = top + (panel_height - original.height()) / 2;
    let processed_y = top + (panel_height - processed.height()) / 2;
    blit(&mut out, original, 0, original_y);
    blit(&mut out, processed, original.width(), processed_y);

    draw_label(&mut out, 0, original.width(), top, "ORIGINAL", ORIGINAL_LABEL_COLOR);
    draw_label(
        &mut out,
        original.width(),
        processed.width(),
        top,
        "PROTECTED",
        PROTECTED_LABEL_COLOR,
    );

    let caption_y = (top + panel_height) as i64 - text_height(LABEL_SCALE) as i64 - 10;
    draw_text(
        &mut out,
        original.width() as i64 + LABEL_OFFSET.0,
        caption_y,
        &format!("FACES: {faces}"),
        LABEL_SCALE,
        CAPTION_COLOR,
    );

    if title_bar {
        draw_title_bar(&mut out);
    }
    out
}

fn draw_label(frame: &mut Frame, x: u32, width: u32, top: u32, text: &str, color: [u8; 3]) {
    blend_rect(
        frame,
        x as i64,
        top as i64,
        width as i64,
        LABEL_STRIP_HEIGHT,
        TITLE_BACKGROUND,
        LABEL_STRIP_ALPHA,
    );
    draw_text(
        frame,
        x as i64 + LABEL_OFFSET.0,
        top as i64 + LABEL_OFFSET.1,
        text,
        LABEL_SCALE,
        color,
    );
}

fn draw_title_bar(frame: &mut Frame) {
    fill_rect(frame, 0, 0, frame.width() as i64, TITLE_BAR_HEIGHT as i64, TITLE_BACKGROUND);
    draw_text(frame, 20, 10, TITLE, 3, TITLE_COLOR);
    draw_text(frame, 20, 42, SUBTITLE, 2, SUBTITLE_COLOR);
}
