use crate::effects::domain::effect_state::EffectState;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for obscuring one face region of a frame.
///
/// Implementations overwrite exactly the pixels inside `region` and leave
/// every other byte of `frame` untouched. `region` has already been clamped
/// to the frame; an empty region is a no-op. Implementations hold no mutable
/// state, so the order in which regions are processed does not matter.
pub trait EffectEngine: Send {
    fn apply(&self, frame: &mut Frame, region: Region, state: &EffectState);
}
