/// Trial state machine phases
///
/// `Idle` → `ArmedWaiting` → `ArmedReady` → `Completed`, then back to `Idle`
/// on start, dismiss or ignore.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum TrialPhase {
    #[default]
    Idle,
    /// Delay timer running, input is ignored.
    ArmedWaiting,
    /// Stimulus shown, awaiting the response.
    ArmedReady,
    Completed,
}

impl TrialPhase {
    pub fn accepts_response(&self) -> bool {
        matches!(self, Self::ArmedReady)
    }

    /// True while a trial occupies the screen (waiting or showing the stimulus).
    pub fn is_running(&self) -> bool {
        matches!(self, Self::ArmedWaiting | Self::ArmedReady)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Whether a trial's result is kept.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum TrialMode {
    #[default]
    Recorded,
    /// Practice trial, never stored.
    DryRun,
}

impl TrialMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Self::DryRun } else { Self::Recorded }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun)
    }
}
