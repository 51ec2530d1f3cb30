use crate::control::domain::control_event::ControlEvent;
use crate::effects::domain::effect_kind::EffectKind;
use crate::effects::domain::effect_state::EffectState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Running,
    Stopped,
}

/// Result of feeding one event to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reaction {
    /// Replacement for the session's effect state.
    pub state: EffectState,
    /// The operator asked for the current composed frame to be saved.
    pub screenshot: bool,
}

/// Translates operator events into effect-state replacements.
///
/// `Stopped` is terminal: once reached, every later event is ignored.
#[derive(Debug)]
pub struct InteractiveController {
    state: ControllerState,
}

impl InteractiveController {
    pub fn new() -> Self {
        Self {
            state: ControllerState::Running,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.state == ControllerState::Stopped
    }

    pub fn handle(&mut self, event: ControlEvent, current: EffectState) -> Reaction {
        let unchanged = Reaction {
            state: current,
            screenshot: false,
        };
        if self.is_stopped() {
            log::debug!("Ignoring {event:?} after stop");
            return unchanged;
        }

        let state = match event {
            ControlEvent::Quit => {
                log::info!("Quit requested");
                self.state = ControllerState::Stopped;
                current
            }
            ControlEvent::Screenshot => {
                return Reaction {
                    state: current,
                    screenshot: true,
                }
            }
            ControlEvent::ToggleSplitView => EffectState {
                split_view: !current.split_view,
                ..current
            },
            ControlEvent::ToggleHelp => EffectState {
                help_visible: !current.help_visible,
                ..current
            },
            ControlEvent::IncreaseIntensity => current.increase_intensity(),
            ControlEvent::DecreaseIntensity => current.decrease_intensity(),
            ControlEvent::SelectEffect(index) => match EffectKind::from_index(index) {
                Some(kind) => EffectState { kind, ..current },
                None => {
                    log::debug!("No effect at index {index}");
                    current
                }
            },
        };

        if state != current {
            log::info!(
                "Effect: {} intensity {} split {} help {}",
                state.kind.label(),
                state.intensity(),
                state.split_view,
                state.help_visible
            );
        }
        Reaction {
            state,
            screenshot: false,
        }
    }
}

impl Default for InteractiveController {
    fn default() -> Self {
        Self::new()
    }
}
