use reflex_core::StimulusVariant;

/// What the screen should show, derived from controller state each frame
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    /// Start / test run / export affordances and a tally of stored trials.
    Menu { recorded: usize, can_export: bool },
    /// Neutral screen while the stimulus delay runs.
    Waiting,
    Stimulus(StimulusVariant),
    Result {
        stimulus: StimulusVariant,
        reaction_ms: f64,
        can_ignore: bool,
        confirming_ignore: bool,
    },
}

pub const MENU_BACKGROUND: [u8; 4] = [28, 28, 30, 255];
pub const WAITING_BACKGROUND: [u8; 4] = [255, 255, 255, 255];
pub const PANEL: [u8; 4] = [0, 0, 0, 255];
pub const BUTTON: [u8; 4] = [242, 242, 247, 255];
pub const BUTTON_DIM: [u8; 4] = [142, 142, 147, 255];
pub const DESTRUCTIVE: [u8; 4] = [255, 69, 58, 255];
pub const READOUT: [u8; 4] = [255, 255, 255, 255];

/// Reaction time that fills the read-out bar completely.
pub const READOUT_FULL_SCALE_MS: f64 = 1000.0;

/// Stored trials shown in the menu tally.
pub const MAX_TALLY: usize = 50;

impl Scene {
    pub fn background(&self) -> [u8; 4] {
        match self {
            Scene::Menu { .. } => MENU_BACKGROUND,
            Scene::Waiting => WAITING_BACKGROUND,
            Scene::Stimulus(s) => s.color(),
            Scene::Result { stimulus, .. } => stimulus.color(),
        }
    }

    /// Fraction of the read-out bar to fill, in `0.0..=1.0`.
    pub fn readout_fraction(reaction_ms: f64) -> f32 {
        (reaction_ms / READOUT_FULL_SCALE_MS).clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_follows_stimulus() {
        assert_eq!(Scene::Waiting.background(), WAITING_BACKGROUND);
        assert_eq!(
            Scene::Stimulus(StimulusVariant::Blue).background(),
            StimulusVariant::Blue.color()
        );
        let result = Scene::Result {
            stimulus: StimulusVariant::Red,
            reaction_ms: 10.0,
            can_ignore: false,
            confirming_ignore: false,
        };
        assert_eq!(result.background(), StimulusVariant::Red.color());
    }

    #[test]
    fn readout_is_clamped() {
        assert_eq!(Scene::readout_fraction(0.0), 0.0);
        assert_eq!(Scene::readout_fraction(250.0), 0.25);
        assert_eq!(Scene::readout_fraction(5000.0), 1.0);
    }
}
