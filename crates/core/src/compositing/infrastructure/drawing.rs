use crate::shared::frame::Frame;

/// Clip a rectangle given in signed coordinates to the frame; returns
/// `(x0, y0, x1, y1)` with exclusive ends, or `None` if nothing is visible.
fn clip(frame: &Frame, x: i64, y: i64, w: i64, h: i64) -> Option<(usize, usize, usize, usize)> {
    let x0 = x.clamp(0, frame.width() as i64);
    let y0 = y.clamp(0, frame.height() as i64);
    let x1 = (x + w).clamp(0, frame.width() as i64);
    let y1 = (y + h).clamp(0, frame.height() as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
}

/// Paint a solid rectangle; parts outside the frame are ignored.
pub fn fill_rect(frame: &mut Frame, x: i64, y: i64, w: i64, h: i64, color: [u8; 3]) {
    blend_rect(frame, x, y, w, h, color, 1.0);
}

/// Mix `color` into a rectangle with the given opacity (0 = invisible,
/// 1 = solid). Extra channels beyond RGB are left as they are.
pub fn blend_rect(frame: &mut Frame, x: i64, y: i64, w: i64, h: i64, color: [u8; 3], alpha: f32) {
    let Some((x0, y0, x1, y1)) = clip(frame, x, y, w, h) else {
        return;
    };
    let width = frame.width() as usize;
    let channels = frame.channels() as usize;
    let alpha = alpha.clamp(0.0, 1.0);
    let data = frame.data_mut();

    for py in y0..y1 {
        for px in x0..x1 {
            let i = (py * width + px) * channels;
            for c in 0..channels.min(3) {
                let src = if channels < 3 { grey(color) } else { color[c] };
                data[i + c] = (src as f32 * alpha + data[i + c] as f32 * (1.0 - alpha)).round() as u8;
            }
        }
    }
}

/// Copy `src` into `dst` with its top-left corner at `(x, y)`, clipped to `dst`.
pub fn blit(dst: &mut Frame, src: &Frame, x: u32, y: u32) {
    debug_assert_eq!(dst.channels(), src.channels());
    let channels = dst.channels() as usize;
    let dst_w = dst.width() as usize;
    let src_w = src.width() as usize;
    if x >= dst.width() || y >= dst.height() {
        return;
    }
    let cols = src.width().min(dst.width() - x) as usize;
    let rows = src.height().min(dst.height() - y) as usize;

    let src_data = src.data();
    let dst_data = dst.data_mut();
    for row in 0..rows {
        let s = row * src_w * channels;
        let d = ((y as usize + row) * dst_w + x as usize) * channels;
        dst_data[d..d + cols * channels].copy_from_slice(&src_data[s..s + cols * channels]);
    }
}

fn grey(color: [u8; 3]) -> u8 {
    ((color[0] as u32 + color[1] as u32 + color[2] as u32) / 3) as u8
}
