/// Abstract operator input, decoupled from the device that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    Quit,
    Screenshot,
    ToggleSplitView,
    IncreaseIntensity,
    DecreaseIntensity,
    /// Zero-based index into [`EffectKind::ALL`](crate::effects::domain::effect_kind::EffectKind::ALL).
    SelectEffect(usize),
    ToggleHelp,
}

impl ControlEvent {
    /// Maps a key press to an event; `None` for keys without a binding.
    ///
    /// Digit `n` selects effect index `n - 1` (`0` selects index 9); indices
    /// with no effect are ignored by the controller.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'q' | 'Q' => Some(ControlEvent::Quit),
            's' | 'S' => Some(ControlEvent::Screenshot),
            ' ' => Some(ControlEvent::ToggleSplitView),
            '+' | '=' => Some(ControlEvent::IncreaseIntensity),
            '-' | '_' => Some(ControlEvent::DecreaseIntensity),
            'h' | 'H' => Some(ControlEvent::ToggleHelp),
            '0' => Some(ControlEvent::SelectEffect(9)),
            '1'..='9' => key
                .to_digit(10)
                .map(|d| ControlEvent::SelectEffect(d as usize - 1)),
            _ => None,
        }
    }
}

/// Key bindings in display order, for the help overlay.
pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("1-6", "select effect"),
    ("+/-", "intensity"),
    ("SPACE", "split view"),
    ("S", "screenshot"),
    ("H", "toggle help"),
    ("Q", "quit"),
];
