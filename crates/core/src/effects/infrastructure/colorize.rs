use crate::effects::infrastructure::roi::luma;

/// Teal the region is re-coloured with.
pub const COLORIZE_TINT: [u8; 3] = [0, 200, 190];

/// Replace every pixel with `COLORIZE_TINT` scaled by the pixel's luma.
///
/// Only brightness survives; hue variation from the source is discarded.
/// Single-channel buffers keep their luma unchanged.
pub fn colorize(data: &mut [u8], channels: usize) {
    if channels < 3 {
        return;
    }
    for pixel in data.chunks_exact_mut(channels) {
        let y = luma(pixel[0], pixel[1], pixel[2]) / 255.0;
        for c in 0..3 {
            pixel[c] = (COLORIZE_TINT[c] as f32 * y).round() as u8;
        }
    }
}
