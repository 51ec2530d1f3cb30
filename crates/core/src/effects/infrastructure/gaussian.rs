/// Precompute a 1D Gaussian kernel of the given size.
///
/// `kernel_size` must be odd and >= 1. Sigma is derived as `kernel_size / 6.0`
/// (matching OpenCV's sigma=0 convention).
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    let sigma = kernel_size as f64 / 6.0;
    let half = (kernel_size / 2) as f64;
    let weights: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|&v| (v / sum) as f32).collect()
}

/// Separable Gaussian blur of a packed buffer, in place.
///
/// Edges replicate the outermost row/column of `data` itself, so nothing
/// outside the buffer ever contributes to the result.
pub fn separable_gaussian_blur(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_size: usize,
) {
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let kernel = gaussian_kernel_1d(kernel_size);
    let half = kernel.len() / 2;
    let mut temp = vec![0.0f32; width * height * channels];

    // Horizontal pass: data → temp
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = (x as isize + k as isize - half as isize).clamp(0, width as isize - 1)
                        as usize;
                    sum += data[(y * width + sx) * channels + c] as f32 * w;
                }
                temp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    // Vertical pass: temp → data
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sy = (y as isize + k as isize - half as isize)
                        .clamp(0, height as isize - 1) as usize;
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_sums_to_one() {
        let k = gaussian_kernel_1d(7);
        let sum: f32 = k.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_kernel_is_symmetric_with_peak_in_centre() {
        let k = gaussian_kernel_1d(9);
        for i in 0..k.len() / 2 {
            assert_relative_eq!(k[i], k[k.len() - 1 - i], epsilon = 1e-6);
            assert!(k[4] >= k[i]);
        }
    }

    #[test]
    fn test_uniform_buffer_unchanged() {
        let mut data = vec![128u8; 10 * 10 * 3];
        separable_gaussian_blur(&mut data, 10, 10, 3, 5);
        assert!(data.iter().all(|&v| (v as i32 - 128).abs() <= 1));
    }

    #[test]
    fn test_single_bright_pixel_spreads() {
        let mut data = vec![0u8; 10 * 10 * 3];
        let centre = (5 * 10 + 5) * 3;
        data[centre..centre + 3].copy_from_slice(&[255, 255, 255]);

        separable_gaussian_blur(&mut data, 10, 10, 3, 5);

        assert!(data[centre] < 255);
        assert!(data[(5 * 10 + 6) * 3] > 0);
    }

    #[test]
    fn test_kernel_size_one_is_identity() {
        let mut data: Vec<u8> = (0..75).collect();
        let original = data.clone();
        separable_gaussian_blur(&mut data, 5, 5, 3, 1);
        assert_eq!(data, original);
    }

    #[test]
    fn test_kernel_wider_than_buffer_stays_in_bounds() {
        let mut data = vec![10u8, 200, 10, 200];
        separable_gaussian_blur(&mut data, 2, 2, 1, 51);
        assert!(data.iter().all(|&v| (10..=200).contains(&v)));
    }
}
