use serde::{Deserialize, Serialize};

/// Color-change stimuli shown to the subject
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StimulusVariant {
    Red,
    Green,
    Blue,
    /// Fallback appearance when no variant could be drawn. Never part of [`STIMULI`].
    #[serde(rename = "Unknown")]
    Neutral,
}

/// The fixed set trials draw from.
pub const STIMULI: [StimulusVariant; 3] = [
    StimulusVariant::Red,
    StimulusVariant::Green,
    StimulusVariant::Blue,
];

impl StimulusVariant {
    pub fn label(&self) -> &'static str {
        match self {
            StimulusVariant::Red => "Red",
            StimulusVariant::Green => "Green",
            StimulusVariant::Blue => "Blue",
            StimulusVariant::Neutral => "Unknown",
        }
    }

    /// Opaque RGBA fill for the whole screen.
    pub fn color(&self) -> [u8; 4] {
        match self {
            StimulusVariant::Red => [255, 59, 48, 255],
            StimulusVariant::Green => [52, 199, 89, 255],
            StimulusVariant::Blue => [0, 122, 255, 255],
            StimulusVariant::Neutral => [255, 255, 255, 255],
        }
    }
}

impl std::fmt::Display for StimulusVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_name_matches_label() {
        for s in STIMULI.iter().chain(std::iter::once(&StimulusVariant::Neutral)) {
            let json = serde_json::to_string(s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.label()));
            assert_eq!(serde_json::from_str::<StimulusVariant>(&json).unwrap(), *s);
        }
        assert!(serde_json::from_str::<StimulusVariant>("\"Purple\"").is_err());
    }

    #[test]
    fn serde_uses_labels() {
        assert_eq!(
            serde_json::to_string(&StimulusVariant::Neutral).unwrap(),
            "\"Unknown\""
        );
        let g: StimulusVariant = serde_json::from_str("\"Green\"").unwrap();
        assert_eq!(g, StimulusVariant::Green);
    }

    #[test]
    fn stimuli_are_opaque_and_distinct() {
        for (i, a) in STIMULI.iter().enumerate() {
            assert_eq!(a.color()[3], 255);
            for b in &STIMULI[i + 1..] {
                assert_ne!(a.color(), b.color());
            }
        }
    }
}
