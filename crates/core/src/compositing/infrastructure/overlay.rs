use crate::compositing::infrastructure::bitmap_font::{draw_text, text_height, text_width};
use crate::compositing::infrastructure::drawing::blend_rect;
use crate::control::domain::control_event::KEY_BINDINGS;
use crate::effects::domain::effect_state::EffectState;
use crate::shared::frame::Frame;

const PANEL_BACKGROUND: [u8; 3] = [0, 0, 0];
const FPS_COLOR: [u8; 3] = [0, 255, 0];
const FACES_COLOR: [u8; 3] = [255, 255, 0];
const TEXT_COLOR: [u8; 3] = [255, 255, 255];
const SCALE: u32 = 2;
const LINE_SPACING: i64 = 8;
const PADDING: i64 = 10;

/// Live statistics shown in the top-left corner.
#[derive(Clone, Copy, Debug)]
pub struct InfoPanel {
    pub fps: f64,
    pub faces: usize,
    pub state: EffectState,
}

pub fn draw_info_panel(frame: &mut Frame, info: &InfoPanel) {
    let lines = [
        (format!("FPS: {:.1}", info.fps), FPS_COLOR),
        (format!("FACES: {}", info.faces), FACES_COLOR),
        (
            format!("EFFECT: {} ({})", info.state.kind.label(), info.state.intensity()),
            TEXT_COLOR,
        ),
    ];
    let texts: Vec<&str> = lines.iter().map(|(t, _)| t.as_str()).collect();
    let (x, y) = (PADDING, PADDING);
    draw_panel_background(frame, x, y, &texts);

    for (i, (text, color)) in lines.iter().enumerate() {
        draw_text(frame, x + PADDING, y + PADDING + i as i64 * line_height(), text, SCALE, *color);
    }
}

/// Centred list of key bindings.
pub fn draw_help_panel(frame: &mut Frame) {
    let mut texts = vec!["CONTROLS".to_string(), String::new()];
    texts.extend(KEY_BINDINGS.iter().map(|(key, action)| format!("{key} - {action}")));
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let (panel_w, panel_h) = panel_size(&refs);
    let x = (frame.width() as i64 - panel_w) / 2;
    let y = (frame.height() as i64 - panel_h) / 2;
    draw_panel_background(frame, x, y, &refs);

    for (i, text) in refs.iter().enumerate() {
        draw_text(frame, x + PADDING, y + PADDING + i as i64 * line_height(), text, SCALE, TEXT_COLOR);
    }
}

fn line_height() -> i64 {
    text_height(SCALE) as i64 + LINE_SPACING
}

fn panel_size(lines: &[&str]) -> (i64, i64) {
    let widest = lines.iter().map(|l| text_width(l, SCALE)).max().unwrap_or(0) as i64;
    (
        widest + 2 * PADDING,
        lines.len() as i64 * line_height() - LINE_SPACING + 2 * PADDING,
    )
}

fn draw_panel_background(frame: &mut Frame, x: i64, y: i64, lines: &[&str]) {
    let (w, h) = panel_size(lines);
    blend_rect(frame, x, y, w, h, PANEL_BACKGROUND, 0.6);
}
