use std::fmt;
use std::str::FromStr;

/// The obscuring transform applied to every detected face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EffectKind {
    #[default]
    Pixelate,
    Blur,
    BlackBox,
    Emoji,
    Colorize,
    WitnessProtection,
}

impl EffectKind {
    /// All effects in selection order (index 0 is bound to key `1`).
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Pixelate,
        EffectKind::Blur,
        EffectKind::BlackBox,
        EffectKind::Emoji,
        EffectKind::Colorize,
        EffectKind::WitnessProtection,
    ];

    /// Zero-based lookup; `None` for indices past the last effect.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Short identifier used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Pixelate => "pixelate",
            EffectKind::Blur => "blur",
            EffectKind::BlackBox => "blackbox",
            EffectKind::Emoji => "emoji",
            EffectKind::Colorize => "colorize",
            EffectKind::WitnessProtection => "witness",
        }
    }

    /// Human-readable name shown in overlays.
    pub fn label(self) -> &'static str {
        match self {
            EffectKind::Pixelate => "Pixelate",
            EffectKind::Blur => "Blur",
            EffectKind::BlackBox => "Black Box",
            EffectKind::Emoji => "Emoji",
            EffectKind::Colorize => "Colorize",
            EffectKind::WitnessProtection => "Witness Protection",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown effect '{0}' (expected one of: {names})", names = effect_names())]
pub struct UnknownEffect(pub String);

fn effect_names() -> String {
    EffectKind::ALL.map(EffectKind::name).join(", ")
}

impl FromStr for EffectKind {
    type Err = UnknownEffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "black-box" | "black_box" => return Ok(EffectKind::BlackBox),
            "witness-protection" | "witness_protection" => {
                return Ok(EffectKind::WitnessProtection)
            }
            _ => {}
        }
        EffectKind::ALL
            .into_iter()
            .find(|k| k.name() == lowered)
            .ok_or(UnknownEffect(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_from_index_follows_declaration_order() {
        assert_eq!(EffectKind::from_index(0), Some(EffectKind::Pixelate));
        assert_eq!(EffectKind::from_index(5), Some(EffectKind::WitnessProtection));
        assert_eq!(EffectKind::from_index(6), None);
    }

    #[rstest]
    #[case("pixelate", EffectKind::Pixelate)]
    #[case("BLUR", EffectKind::Blur)]
    #[case("blackbox", EffectKind::BlackBox)]
    #[case("black-box", EffectKind::BlackBox)]
    #[case(" emoji ", EffectKind::Emoji)]
    #[case("colorize", EffectKind::Colorize)]
    #[case("witness", EffectKind::WitnessProtection)]
    #[case("witness_protection", EffectKind::WitnessProtection)]
    fn test_parse(#[case] input: &str, #[case] expected: EffectKind) {
        assert_eq!(input.parse::<EffectKind>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_lists_choices() {
        let err = "sepia".parse::<EffectKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("sepia"));
        assert!(msg.contains("pixelate"));
    }

    #[test]
    fn test_unknown_effect_message_lists_every_name() {
        let err = UnknownEffect("sepia".to_string());
        assert_eq!(
            err.to_string(),
            "unknown effect 'sepia' (expected one of: pixelate, blur, blackbox, emoji, colorize, witness)"
        );
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.to_string().parse::<EffectKind>().unwrap(), kind);
        }
    }
}
