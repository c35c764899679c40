use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use reflex_core::{STIMULI, StimulusVariant, TrialMode, TrialPhase, TrialRecord};
use reflex_timing::{Clock, ScheduledTask};
use tracing::{debug, error, info};

use crate::config::ControllerConfig;
use crate::error::{ConfigError, IgnoreError};
use crate::store::{RecordId, ResultStore};
use crate::trial::Trial;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    StimulusPresented(StimulusVariant),
}

/// Single source of truth for the reaction time task.
///
/// Drives `Idle → ArmedWaiting → ArmedReady → Completed` and owns the result
/// store. The front-end observes it and forwards input; it never mutates trial
/// state directly.
pub struct TrialController<C, R>
where
    C: Clock,
    R: Rng,
{
    config: ControllerConfig,
    clock: C,
    rng: R,
    phase: TrialPhase,
    current: Option<Trial>,
    trial_number: u64,
    last_reaction_ms: Option<f64>,
    /// Record that may still be ignored. Cleared when the next trial starts.
    ignorable: Option<RecordId>,
    store: ResultStore,
}

impl<C, R> TrialController<C, R>
where
    C: Clock,
    R: Rng,
{
    pub fn new(config: ControllerConfig, clock: C, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            rng,
            phase: TrialPhase::Idle,
            current: None,
            trial_number: 0,
            last_reaction_ms: None,
            ignorable: None,
            store: ResultStore::new(),
        })
    }

    /// Arms a new trial and schedules the stimulus after a random delay.
    ///
    /// A stimulus still pending from an earlier trial is cancelled first.
    pub fn start_trial(&mut self, dry_run: bool) {
        if let Some(previous) = self.current.as_mut() {
            if previous.task.cancel() {
                debug!(trial = previous.id, "cancelled pending stimulus");
            }
        }

        let (min_ms, max_ms) = self.config.delay_range_ms;
        let delay_ms = self.rng.random_range(min_ms..=max_ms);
        let now = self.clock.now();
        let id = self.trial_number;
        self.trial_number += 1;

        let task = ScheduledTask::new(now, Duration::from_millis(delay_ms));
        self.current = Some(Trial::new(id, TrialMode::from_dry_run(dry_run), task));
        self.last_reaction_ms = None;
        self.ignorable = None;
        self.phase = TrialPhase::ArmedWaiting;

        info!(trial = id, dry_run, delay_ms, "trial started");
    }

    /// Polls the pending stimulus. Call once per frame.
    pub fn update(&mut self) -> Option<ControllerEvent> {
        let now = self.clock.now();
        let due = self.current.as_mut().is_some_and(|t| t.task.poll(now));
        if !due {
            return None;
        }
        self.present_stimulus().map(ControllerEvent::StimulusPresented)
    }

    /// Shows a randomly chosen stimulus and starts the reaction clock.
    ///
    /// No-op outside `ArmedWaiting`. Consumes the pending task, so the
    /// stimulus is presented once per trial even when called directly.
    pub fn present_stimulus(&mut self) -> Option<StimulusVariant> {
        if self.phase != TrialPhase::ArmedWaiting {
            return None;
        }
        let stimulus = self.choose_stimulus();
        let now = self.clock.now();
        let wall = self.clock.wall_time();

        let trial = self.current.as_mut()?;
        trial.task.cancel();
        trial.stimulus = Some(stimulus);
        trial.timestamps.stimulus_start = Some(now);
        trial.timestamps.stimulus_wall = Some(wall);
        self.phase = TrialPhase::ArmedReady;

        debug!(trial = trial.id, stimulus = %stimulus, at_ns = now, "stimulus presented");
        Some(stimulus)
    }

    /// Records the response to the shown stimulus and returns the reaction
    /// time in milliseconds.
    ///
    /// Input before the stimulus or with no active trial is ignored.
    pub fn register_response(&mut self) -> Option<f64> {
        if !self.phase.accepts_response() {
            debug!(phase = ?self.phase, "response ignored");
            return None;
        }
        let now = self.clock.now();
        let trial = self.current.as_mut()?;
        trial.timestamps.response = Some(now);
        let reaction_ms = trial.reaction_ms()?;
        self.phase = TrialPhase::Completed;
        self.last_reaction_ms = Some(reaction_ms);

        if trial.mode.is_dry_run() {
            info!(trial = trial.id, reaction_ms, "dry run complete, result not stored");
            return Some(reaction_ms);
        }

        let stimulus = trial.stimulus.unwrap_or(StimulusVariant::Neutral);
        let timestamp = match trial.timestamps.stimulus_wall {
            Some(ts) => ts,
            None => self.clock.wall_time(),
        };
        let id = self
            .store
            .append(TrialRecord::new(timestamp, reaction_ms, stimulus));
        self.ignorable = Some(id);

        info!(
            trial = trial.id,
            reaction_ms,
            stimulus = %stimulus,
            stored = self.store.len(),
            "trial recorded"
        );
        Some(reaction_ms)
    }

    /// Leaves the result screen. The stored record, if any, stays.
    pub fn dismiss_result(&mut self) -> bool {
        if !self.phase.is_completed() {
            return false;
        }
        self.phase = TrialPhase::Idle;
        self.current = None;
        self.last_reaction_ms = None;
        true
    }

    /// Excludes the last recorded trial from export.
    ///
    /// Irreversible, so the caller confirms with the user first. Only the
    /// record of the most recent trial qualifies, and only until the next
    /// trial starts. Leaves the result screen on success.
    pub fn mark_last_ignored(&mut self) -> Result<RecordId, IgnoreError> {
        let id = self.ignorable.ok_or(IgnoreError::NoRecordedTrial)?;
        self.store.ignore_latest(id)?;
        self.ignorable = None;
        self.dismiss_result();
        info!(record = id.index(), "trial marked as ignored");
        Ok(id)
    }

    fn choose_stimulus(&mut self) -> StimulusVariant {
        match STIMULI[..].choose(&mut self.rng) {
            Some(stimulus) => *stimulus,
            None => {
                error!("stimulus set is empty, presenting neutral fallback");
                debug_assert!(false, "stimulus selection from a fixed set failed");
                StimulusVariant::Neutral
            }
        }
    }

    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    pub fn mode(&self) -> Option<TrialMode> {
        self.current.as_ref().map(|t| t.mode)
    }

    pub fn current_trial(&self) -> Option<&Trial> {
        self.current.as_ref()
    }

    /// Stimulus on screen, from presentation until the result is dismissed.
    pub fn current_stimulus(&self) -> Option<StimulusVariant> {
        self.current.as_ref().and_then(|t| t.stimulus)
    }

    /// Reaction time shown on the result screen.
    pub fn last_reaction_ms(&self) -> Option<f64> {
        self.last_reaction_ms
    }

    pub fn can_ignore_last(&self) -> bool {
        self.ignorable.is_some()
    }

    /// Time left before the pending stimulus appears.
    pub fn pending_delay(&self) -> Option<Duration> {
        let trial = self.current.as_ref()?;
        trial
            .task
            .is_pending()
            .then(|| trial.task.remaining(self.clock.now()))
    }

    pub fn trials_started(&self) -> u64 {
        self.trial_number
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
