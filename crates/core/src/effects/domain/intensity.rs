//! Mappings from the operator-facing intensity (5–50) to transform parameters.
//!
//! All mappings are monotonic non-decreasing in intensity.

use crate::shared::constants::{MAX_INTENSITY, MIN_INTENSITY};

/// Pixelate tile edge in pixels: the intensity itself, clamped to 5–50.
pub fn pixel_block_size(intensity: u8) -> usize {
    intensity.clamp(MIN_INTENSITY, MAX_INTENSITY) as usize
}

/// Gaussian kernel width: `max(3, nearest_odd(intensity))`.
pub fn blur_kernel_size(intensity: u8) -> usize {
    nearest_odd(intensity as usize).max(3)
}

/// Smallest odd number `>= n`.
pub fn nearest_odd(n: usize) -> usize {
    n | 1
}

/// Peak pixel displacement of the witness-protection warp.
pub fn displacement_amplitude(intensity: u8) -> f32 {
    intensity.clamp(MIN_INTENSITY, MAX_INTENSITY) as f32 / 5.0
}
