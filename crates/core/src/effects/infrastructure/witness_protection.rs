use std::f32::consts::TAU;

use crate::effects::infrastructure::gaussian::separable_gaussian_blur;
use crate::effects::infrastructure::roi::luma;

/// Wavelength of the displacement warp, in pixels.
const WAVE_PERIOD: f32 = 16.0;

/// Warp, then blur, then desaturate a packed buffer.
///
/// The three steps always run in this order and use no randomness, so the
/// same pixels and parameters produce the same output.
pub fn witness_protection(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    amplitude: f32,
    kernel_size: usize,
) {
    if width == 0 || height == 0 {
        return;
    }
    displace(data, width, height, channels, amplitude);
    separable_gaussian_blur(data, width, height, channels, kernel_size);
    desaturate(data, channels);
}

/// Sinusoidal displacement: rows shift horizontally, columns vertically.
/// Sample positions are clamped so only pixels of `data` are read.
fn displace(data: &mut [u8], width: usize, height: usize, channels: usize, amplitude: f32) {
    let source = data.to_vec();
    for y in 0..height {
        let dx = (amplitude * (TAU * y as f32 / WAVE_PERIOD).sin()).round() as isize;
        for x in 0..width {
            let dy = (amplitude * (TAU * x as f32 / WAVE_PERIOD).sin()).round() as isize;
            let sx = (x as isize + dx).clamp(0, width as isize - 1) as usize;
            let sy = (y as isize + dy).clamp(0, height as isize - 1) as usize;
            let dst = (y * width + x) * channels;
            let src = (sy * width + sx) * channels;
            data[dst..dst + channels].copy_from_slice(&source[src..src + channels]);
        }
    }
}

fn desaturate(data: &mut [u8], channels: usize) {
    if channels < 3 {
        return;
    }
    for pixel in data.chunks_exact_mut(channels) {
        let y = luma(pixel[0], pixel[1], pixel[2]).round().clamp(0.0, 255.0) as u8;
        pixel[..3].fill(y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(width: usize, height: usize) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| {
                let v = (i * 37 % 256) as u8;
                [v, 255 - v, v / 2]
            })
            .collect()
    }

    #[test]
    fn test_output_is_grey() {
        let mut data = pattern(20, 20);
        witness_protection(&mut data, 20, 20, 3, 3.0, 5);
        for px in data.chunks_exact(3) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_is_deterministic() {
        let mut a = pattern(30, 24);
        let mut b = a.clone();
        witness_protection(&mut a, 30, 24, 3, 6.0, 11);
        witness_protection(&mut b, 30, 24, 3, 6.0, 11);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_amplitude_displacement_is_identity() {
        let mut data = pattern(8, 8);
        let original = data.clone();
        displace(&mut data, 8, 8, 3, 0.0);
        assert_eq!(data, original);
    }

    #[test]
    fn test_displacement_moves_pixels() {
        let mut data = pattern(32, 32);
        let original = data.clone();
        displace(&mut data, 32, 32, 3, 4.0);
        assert_ne!(data, original);
    }

    #[test]
    fn test_uniform_input_stays_uniform() {
        let mut data = vec![90u8; 12 * 12 * 3];
        witness_protection(&mut data, 12, 12, 3, 10.0, 21);
        assert!(data.iter().all(|&v| (v as i32 - 90).abs() <= 1));
    }

    #[test]
    fn test_single_pixel_buffer() {
        let mut data = vec![255u8, 0, 0];
        witness_protection(&mut data, 1, 1, 3, 10.0, 51);
        assert_eq!(data, vec![76, 76, 76]);
    }
}
