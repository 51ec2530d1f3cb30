use crate::effects::domain::effect_kind::EffectKind;
use crate::shared::constants::{DEFAULT_INTENSITY, INTENSITY_STEP, MAX_INTENSITY, MIN_INTENSITY};

/// Live effect configuration for a session.
///
/// A plain `Copy` value: the pipeline takes one snapshot per frame and the
/// controller replaces the session's value between frames, so a frame can
/// never observe a half-applied change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectState {
    pub kind: EffectKind,
    pub(crate) intensity: u8,
    pub split_view: bool,
    pub help_visible: bool,
}

impl EffectState {
    /// Builds a state with `intensity` clamped into the supported range.
    pub fn new(kind: EffectKind, intensity: u8) -> Self {
        Self {
            kind,
            intensity: clamp_intensity(intensity as i32),
            split_view: false,
            help_visible: false,
        }
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    pub fn with_intensity(self, intensity: u8) -> Self {
        Self {
            intensity: clamp_intensity(intensity as i32),
            ..self
        }
    }

    pub fn increase_intensity(self) -> Self {
        Self {
            intensity: clamp_intensity(self.intensity as i32 + INTENSITY_STEP as i32),
            ..self
        }
    }

    pub fn decrease_intensity(self) -> Self {
        Self {
            intensity: clamp_intensity(self.intensity as i32 - INTENSITY_STEP as i32),
            ..self
        }
    }
}

impl Default for EffectState {
    fn default() -> Self {
        Self::new(EffectKind::default(), DEFAULT_INTENSITY)
    }
}

fn clamp_intensity(value: i32) -> u8 {
    value.clamp(MIN_INTENSITY as i32, MAX_INTENSITY as i32) as u8
}
