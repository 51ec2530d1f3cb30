pub const BLACK_BOX_COLOR: [u8; 3] = [0, 0, 0];

/// Fill a packed buffer with [`BLACK_BOX_COLOR`].
pub fn black_box(data: &mut [u8], channels: usize) {
    for pixel in data.chunks_exact_mut(channels) {
        for (c, value) in pixel.iter_mut().enumerate() {
            // Alpha (or any extra plane) stays opaque.
            *value = BLACK_BOX_COLOR.get(c).copied().unwrap_or(u8::MAX);
        }
    }
}
