use std::path::PathBuf;

use crate::compositing::domain::display_layout::DisplayLayout;
use crate::effects::domain::effect_state::EffectState;
use crate::shared::constants::DEFAULT_SCREENSHOT_DIR;

/// Everything a [`Session`](super::session::Session) needs besides its ports.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Effect, intensity and toggles in force for frame 0.
    pub initial_state: EffectState,
    pub layout: DisplayLayout,
    /// Draw the rate / faces / effect panel on single-layout output.
    pub show_info: bool,
    pub screenshot_dir: PathBuf,
    /// Progress is reported every this many frames.
    pub progress_every: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_state: EffectState::default(),
            layout: DisplayLayout::Single,
            show_info: true,
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            progress_every: 30,
        }
    }
}
