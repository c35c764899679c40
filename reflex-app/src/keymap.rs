use reflex_core::TrialPhase;
use winit::keyboard::KeyCode;

use crate::session::Command;

/// Keyboard bindings for each screen.
pub fn command_for_key(key: KeyCode, phase: TrialPhase, confirming_ignore: bool) -> Option<Command> {
    if confirming_ignore {
        return match key {
            KeyCode::KeyY => Some(Command::ConfirmIgnore),
            KeyCode::KeyN | KeyCode::Escape => Some(Command::CancelIgnore),
            _ => None,
        };
    }
    match (phase, key) {
        (_, KeyCode::Escape) => Some(Command::Quit),
        (TrialPhase::Idle, KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::KeyS) => {
            Some(Command::StartRecorded)
        }
        (TrialPhase::Idle, KeyCode::KeyT) => Some(Command::StartDryRun),
        (TrialPhase::Idle, KeyCode::KeyE) => Some(Command::Export),
        (TrialPhase::ArmedWaiting | TrialPhase::ArmedReady, KeyCode::Space) => {
            Some(Command::Respond)
        }
        (TrialPhase::Completed, KeyCode::KeyM | KeyCode::Backspace) => Some(Command::Dismiss),
        (TrialPhase::Completed, KeyCode::KeyI) => Some(Command::RequestIgnore),
        _ => None,
    }
}

/// Clicks and touches only count as responses during a trial.
pub fn command_for_pointer(phase: TrialPhase) -> Option<Command> {
    phase.is_running().then_some(Command::Respond)
}
