use crate::effects::domain::effect_engine::EffectEngine;
use crate::effects::domain::effect_kind::EffectKind;
use crate::effects::domain::effect_state::EffectState;
use crate::effects::domain::intensity::{blur_kernel_size, displacement_amplitude, pixel_block_size};
use crate::effects::infrastructure::black_box::black_box;
use crate::effects::infrastructure::colorize::colorize;
use crate::effects::infrastructure::emoji::EmojiAsset;
use crate::effects::infrastructure::gaussian::separable_gaussian_blur;
use crate::effects::infrastructure::pixelate::pixelate;
use crate::effects::infrastructure::roi::{extract_roi, write_roi_back, RoiRect};
use crate::effects::infrastructure::witness_protection::witness_protection;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// CPU implementation of every [`EffectKind`].
///
/// Each call copies the region out of the frame, transforms the copy, and
/// writes it back, so transforms only ever see pixels inside the region.
pub struct CpuEffectEngine {
    emoji: Option<EmojiAsset>,
}

impl CpuEffectEngine {
    /// Engine whose emoji effect falls back to a black box.
    pub fn new() -> Self {
        Self { emoji: None }
    }

    pub fn with_emoji(emoji: Option<EmojiAsset>) -> Self {
        Self { emoji }
    }
}

impl Default for CpuEffectEngine {
    fn default() -> Self {
        Self::with_emoji(Some(EmojiAsset::smiley()))
    }
}

impl EffectEngine for CpuEffectEngine {
    fn apply(&self, frame: &mut Frame, region: Region, state: &EffectState) {
        if region.is_empty() {
            return;
        }
        if !region.fits_within(frame.width(), frame.height()) {
            log::warn!(
                "Skipping region {region:?} outside {}x{} frame",
                frame.width(),
                frame.height()
            );
            return;
        }

        let frame_w = frame.width() as usize;
        let channels = frame.channels() as usize;
        let rect = RoiRect::from(region);
        let mut roi = extract_roi(frame.data(), frame_w, channels, rect);

        match state.kind {
            EffectKind::Pixelate => {
                pixelate(&mut roi, rect.w, rect.h, channels, pixel_block_size(state.intensity()))
            }
            EffectKind::Blur => separable_gaussian_blur(
                &mut roi,
                rect.w,
                rect.h,
                channels,
                blur_kernel_size(state.intensity()),
            ),
            EffectKind::BlackBox => black_box(&mut roi, channels),
            EffectKind::Emoji => match &self.emoji {
                Some(asset) => asset.composite(&mut roi, rect.w, rect.h, channels),
                None => {
                    log::debug!("No emoji asset; filling {region:?} with black box");
                    black_box(&mut roi, channels);
                }
            },
            EffectKind::Colorize => colorize(&mut roi, channels),
            EffectKind::WitnessProtection => witness_protection(
                &mut roi,
                rect.w,
                rect.h,
                channels,
                displacement_amplitude(state.intensity()),
                blur_kernel_size(state.intensity()),
            ),
        }

        write_roi_back(frame.data_mut(), &roi, frame_w, channels, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{MAX_INTENSITY, MIN_INTENSITY};
    use rstest::rstest;

    /// 640x480 frame with a position-dependent pattern so every transform
    /// actually changes something.
    fn textured_frame(width: u32, height: u32) -> Frame {
        let data = (0..height)
            .flat_map(|y| {
                (0..width).flat_map(move |x| {
                    [
                        ((x * 7 + y * 3) % 256) as u8,
                        ((x * 13) % 256) as u8,
                        ((y * 11) % 256) as u8,
                    ]
                })
            })
            .collect();
        Frame::new(data, width, height, 3, 0)
    }

    fn assert_outside_unchanged(before: &Frame, after: &Frame, region: Region) {
        for y in 0..before.height() {
            for x in 0..before.width() {
                if !region.contains(x, y) {
                    assert_eq!(before.pixel(x, y), after.pixel(x, y), "pixel ({x},{y}) changed");
                }
            }
        }
    }

    #[rstest]
    fn test_only_region_pixels_change(
        #[values(
            EffectKind::Pixelate,
            EffectKind::Blur,
            EffectKind::BlackBox,
            EffectKind::Emoji,
            EffectKind::Colorize,
            EffectKind::WitnessProtection
        )]
        kind: EffectKind,
        #[values(5, 50)] intensity: u8,
    ) {
        let original = textured_frame(120, 90);
        let region = Region::new(30, 20, 45, 37);
        let mut frame = original.clone();

        CpuEffectEngine::default().apply(&mut frame, region, &EffectState::new(kind, intensity));

        assert_outside_unchanged(&original, &frame, region);
        assert_ne!(frame, original, "{kind} left the region untouched");
    }

    #[test]
    fn test_pixelate_stays_in_region_at_every_intensity() {
        let original = textured_frame(120, 90);
        let region = Region::new(30, 20, 45, 37);
        let engine = CpuEffectEngine::new();

        for intensity in MIN_INTENSITY..=MAX_INTENSITY {
            let mut frame = original.clone();
            engine.apply(&mut frame, region, &EffectState::new(EffectKind::Pixelate, intensity));
            assert_outside_unchanged(&original, &frame, region);
            assert_ne!(frame, original, "intensity {intensity} left the region untouched");
        }
    }

    /// Same texture inside `region`, `fill` everywhere else.
    fn framed(region: Region, fill: u8) -> Frame {
        let texture = textured_frame(80, 60);
        let mut frame = Frame::new(vec![fill; 80 * 60 * 3], 80, 60, 3, 0);
        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                let i = ((y * 80 + x) * 3) as usize;
                frame.data_mut()[i..i + 3].copy_from_slice(texture.pixel(x, y));
            }
        }
        frame
    }

    fn region_bytes(frame: &Frame, region: Region) -> Vec<u8> {
        let mut out = Vec::new();
        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                out.extend_from_slice(frame.pixel(x, y));
            }
        }
        out
    }

    #[rstest]
    fn test_region_output_ignores_surrounding_pixels(
        #[values(EffectKind::Blur, EffectKind::WitnessProtection)] kind: EffectKind,
        #[values(5, 50)] intensity: u8,
    ) {
        let region = Region::new(20, 15, 30, 25);
        let state = EffectState::new(kind, intensity);
        let engine = CpuEffectEngine::new();

        let mut dark = framed(region, 0);
        let mut bright = framed(region, 255);
        assert_eq!(region_bytes(&dark, region), region_bytes(&bright, region));

        engine.apply(&mut dark, region, &state);
        engine.apply(&mut bright, region, &state);

        assert_eq!(region_bytes(&dark, region), region_bytes(&bright, region));
    }

    #[test]
    fn test_pixelate_scenario_produces_blocks() {
        let original = textured_frame(640, 480);
        let region = Region::new(100, 100, 50, 50);
        let mut frame = original.clone();

        CpuEffectEngine::new().apply(&mut frame, region, &EffectState::new(EffectKind::Pixelate, 15));

        assert_outside_unchanged(&original, &frame, region);
        // Tiles are 15px, anchored at the region origin.
        assert_eq!(frame.pixel(100, 100), frame.pixel(114, 114));
        assert_eq!(frame.pixel(115, 100), frame.pixel(129, 114));
        assert_eq!(frame.pixel(145, 145), frame.pixel(149, 149));
        assert_ne!(frame.pixel(100, 100), original.pixel(100, 100));
    }

    #[test]
    fn test_emoji_without_asset_is_black_box() {
        let mut frame = textured_frame(64, 64);
        let region = Region::new(10, 10, 20, 20);

        CpuEffectEngine::with_emoji(None).apply(&mut frame, region, &EffectState::new(EffectKind::Emoji, 15));

        for y in 10..30 {
            for x in 10..30 {
                assert_eq!(frame.pixel(x, y), &[0, 0, 0]);
            }
        }
    }

    #[test]
    fn test_empty_region_is_noop() {
        let original = textured_frame(32, 32);
        let mut frame = original.clone();
        CpuEffectEngine::default().apply(&mut frame, Region::new(5, 5, 0, 10), &EffectState::default());
        assert_eq!(frame, original);
    }

    #[test]
    fn test_out_of_bounds_region_is_skipped() {
        let original = textured_frame(32, 32);
        let mut frame = original.clone();
        CpuEffectEngine::default().apply(&mut frame, Region::new(20, 20, 20, 20), &EffectState::default());
        assert_eq!(frame, original);
    }

    #[test]
    fn test_region_results_do_not_depend_on_order() {
        let original = textured_frame(100, 100);
        let a = Region::new(0, 0, 40, 40);
        let b = Region::new(50, 50, 30, 30);
        let state = EffectState::new(EffectKind::WitnessProtection, 25);
        let engine = CpuEffectEngine::default();

        let mut ab = original.clone();
        engine.apply(&mut ab, a, &state);
        engine.apply(&mut ab, b, &state);

        let mut ba = original.clone();
        engine.apply(&mut ba, b, &state);
        engine.apply(&mut ba, a, &state);

        assert_eq!(ab, ba);
    }

    #[test]
    fn test_region_overflowing_u32_is_skipped() {
        let original = textured_frame(32, 32);
        let mut frame = original.clone();
        CpuEffectEngine::default().apply(
            &mut frame,
            Region::new(u32::MAX - 5, 0, 10, 10),
            &EffectState::default(),
        );
        assert_eq!(frame, original);
    }

    #[test]
    fn test_region_touching_frame_edge() {
        let original = textured_frame(40, 30);
        let region = Region::new(25, 15, 15, 15);
        let mut frame = original.clone();
        CpuEffectEngine::default().apply(&mut frame, region, &EffectState::new(EffectKind::Blur, 50));
        assert_outside_unchanged(&original, &frame, region);
    }
}
