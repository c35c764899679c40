use chrono::{DateTime, Local};
use reflex_core::{StimulusVariant, TrialMode};
use reflex_timing::ScheduledTask;

/// The trial currently owned by the controller
#[derive(Debug, Clone)]
pub struct Trial {
    pub id: u64,
    pub mode: TrialMode,
    /// Set when the stimulus is presented.
    pub stimulus: Option<StimulusVariant>,
    /// Pending stimulus presentation.
    pub task: ScheduledTask,
    pub timestamps: TrialTimestamps,
}

#[derive(Debug, Clone, Default)]
pub struct TrialTimestamps {
    pub start: u64,
    pub stimulus_start: Option<u64>,
    pub stimulus_wall: Option<DateTime<Local>>,
    pub response: Option<u64>,
}

impl Trial {
    pub fn new(id: u64, mode: TrialMode, task: ScheduledTask) -> Self {
        Self {
            id,
            mode,
            stimulus: None,
            timestamps: TrialTimestamps {
                start: task.armed_at(),
                ..Default::default()
            },
            task,
        }
    }

    /// Milliseconds from stimulus to response, once both happened.
    pub fn reaction_ms(&self) -> Option<f64> {
        let start = self.timestamps.stimulus_start?;
        let response = self.timestamps.response?;
        Some(response.saturating_sub(start) as f64 / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn reaction_needs_both_timestamps() {
        let task = ScheduledTask::new(10, Duration::from_millis(1));
        let mut trial = Trial::new(0, TrialMode::Recorded, task);
        assert_eq!(trial.timestamps.start, 10);
        assert_eq!(trial.reaction_ms(), None);

        trial.timestamps.stimulus_start = Some(1_000_000);
        assert_eq!(trial.reaction_ms(), None);

        trial.timestamps.response = Some(251_000_000);
        assert_eq!(trial.reaction_ms(), Some(250.0));
    }
}
