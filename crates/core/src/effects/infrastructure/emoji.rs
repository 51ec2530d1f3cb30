use std::path::Path;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::effects::infrastructure::roi::luma;

/// Edge length of the built-in smiley.
const SMILEY_SIZE: u32 = 128;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to load emoji asset {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("emoji asset {0} has zero size")]
    Empty(String),
}

/// RGBA overlay drawn over faces by the emoji effect.
#[derive(Clone, Debug)]
pub struct EmojiAsset {
    image: RgbaImage,
}

impl EmojiAsset {
    /// Loads an image file; any format the `image` crate decodes is accepted.
    /// Images without an alpha channel are treated as fully opaque.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let image = image::open(path)
            .map_err(|source| AssetError::Load {
                path: path.display().to_string(),
                source,
            })?
            .to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(AssetError::Empty(path.display().to_string()));
        }
        log::info!(
            "Loaded emoji asset {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self { image })
    }

    /// Yellow smiley with a transparent background.
    pub fn smiley() -> Self {
        let size = SMILEY_SIZE as f32;
        let centre = size / 2.0;
        let face_radius = size / 2.0 - 1.0;
        let eye_radius = size / 12.0;
        let eyes = [(size / 3.0, size / 3.0), (size * 2.0 / 3.0, size / 3.0)];
        let mouth_centre = (centre, size * 0.55);
        let mouth_radius = size / 4.0;
        let mouth_thickness = (size / 25.0).max(2.0);

        let image = RgbaImage::from_fn(SMILEY_SIZE, SMILEY_SIZE, |x, y| {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let dist = |(cx, cy): (f32, f32)| ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();

            if dist((centre, centre)) > face_radius {
                return Rgba([0, 0, 0, 0]);
            }
            if eyes.iter().any(|&eye| dist(eye) <= eye_radius) {
                return Rgba([0, 0, 0, 255]);
            }
            let on_mouth = py > mouth_centre.1
                && (dist(mouth_centre) - mouth_radius).abs() <= mouth_thickness / 2.0;
            if on_mouth {
                return Rgba([0, 0, 0, 255]);
            }
            Rgba([255, 220, 0, 255])
        });
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Stretch the asset to `width`×`height` and alpha-blend it over a packed
    /// buffer. Stretching (not cropping) guarantees the whole buffer is covered.
    pub fn composite(&self, data: &mut [u8], width: usize, height: usize, channels: usize) {
        if width == 0 || height == 0 {
            return;
        }
        let scaled = image::imageops::resize(
            &self.image,
            width as u32,
            height as u32,
            FilterType::Triangle,
        );

        for (pixel, overlay) in data.chunks_exact_mut(channels).zip(scaled.pixels()) {
            let [r, g, b, a] = overlay.0;
            let alpha = a as f32 / 255.0;
            let blend = |dst: u8, src: u8| {
                (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8
            };
            if channels >= 3 {
                pixel[0] = blend(pixel[0], r);
                pixel[1] = blend(pixel[1], g);
                pixel[2] = blend(pixel[2], b);
            } else {
                let y = luma(r, g, b).round() as u8;
                pixel[0] = blend(pixel[0], y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_smiley_has_transparent_corners_and_yellow_face() {
        let asset = EmojiAsset::smiley();
        assert_eq!(asset.image.get_pixel(0, 0).0[3], 0);
        let cheek = asset.image.get_pixel(SMILEY_SIZE / 2, SMILEY_SIZE / 2 - 8);
        assert_eq!(cheek.0, [255, 220, 0, 255]);
        let eye = asset.image.get_pixel(SMILEY_SIZE / 3, SMILEY_SIZE / 3);
        assert_eq!(eye.0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_composite_keeps_background_under_transparent_corners() {
        let asset = EmojiAsset::smiley();
        let (w, h) = (40, 60);
        let mut data = vec![10u8; w * h * 3];
        asset.composite(&mut data, w, h, 3);

        assert_eq!(&data[..3], &[10, 10, 10]);
        let centre = ((h / 2 - 4) * w + w / 2) * 3;
        assert!(data[centre] > 200, "centre should be yellow");
    }

    #[test]
    fn test_opaque_asset_fully_covers_region() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("red.png");
        RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let asset = EmojiAsset::load(&path).unwrap();
        let mut data = vec![0u8; 7 * 3 * 3];
        asset.composite(&mut data, 7, 3, 3);
        for px in data.chunks_exact(3) {
            assert_eq!(px, &[255, 0, 0]);
        }
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = EmojiAsset::load(Path::new("/nonexistent/emoji.png"));
        assert!(matches!(result, Err(AssetError::Load { .. })));
    }

    #[test]
    fn test_composite_on_grey_buffer() {
        let asset = EmojiAsset::smiley();
        let mut data = vec![0u8; 16 * 16];
        asset.composite(&mut data, 16, 16, 1);
        assert!(data.iter().any(|&v| v > 0));
    }
}
