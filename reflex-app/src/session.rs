use rand::Rng;
use reflex_core::{TrialMode, TrialPhase};
use reflex_experiment::{
    ConfigError, ControllerConfig, Destination, ExportOptions, TrialController,
    export_to_destination,
};
use reflex_render::Scene;
use reflex_timing::Clock;
use tracing::{debug, info, warn};

/// User intent, already decoded from keys, clicks or touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartRecorded,
    StartDryRun,
    Respond,
    Dismiss,
    RequestIgnore,
    ConfirmIgnore,
    CancelIgnore,
    Export,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Everything the window shows, independent of the windowing system.
///
/// Wraps the trial controller with the presentation-only bits: the pending
/// ignore confirmation, the export destination and the last status message.
pub struct Session<C: Clock, R: Rng> {
    controller: TrialController<C, R>,
    destination: Box<dyn Destination>,
    export_options: ExportOptions,
    confirming_ignore: bool,
    status: Option<String>,
}

impl<C: Clock, R: Rng> Session<C, R> {
    pub fn new(
        config: ControllerConfig,
        clock: C,
        rng: R,
        destination: Box<dyn Destination>,
        export_options: ExportOptions,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            controller: TrialController::new(config, clock, rng)?,
            destination,
            export_options,
            confirming_ignore: false,
            status: None,
        })
    }

    /// Advances the pending stimulus timer. Call once per frame.
    pub fn tick(&mut self) {
        self.controller.update();
    }

    pub fn apply(&mut self, command: Command) -> Flow {
        let phase = self.controller.phase();
        match command {
            Command::StartRecorded | Command::StartDryRun if phase.is_idle() => {
                self.status = None;
                self.controller
                    .start_trial(command == Command::StartDryRun);
            }
            Command::Respond => {
                self.controller.register_response();
            }
            Command::Dismiss => {
                self.confirming_ignore = false;
                self.controller.dismiss_result();
            }
            Command::RequestIgnore if phase.is_completed() && self.controller.can_ignore_last() => {
                self.confirming_ignore = true;
            }
            Command::ConfirmIgnore if self.confirming_ignore => {
                self.confirming_ignore = false;
                if let Err(e) = self.controller.mark_last_ignored() {
                    warn!(error = %e, "could not ignore trial");
                }
            }
            Command::CancelIgnore => self.confirming_ignore = false,
            Command::Export if phase.is_idle() => self.export(),
            Command::Quit => return Flow::Exit,
            other => debug!(command = ?other, phase = ?phase, "command not available"),
        }
        Flow::Continue
    }

    /// Writes all non-ignored records. Only offered once something was stored.
    pub fn export(&mut self) {
        let store = self.controller.store();
        if store.is_empty() {
            debug!("nothing to export");
            return;
        }
        let result = export_to_destination(
            store.exportable(),
            self.destination.as_mut(),
            self.export_options,
        );
        self.status = Some(match result {
            Ok(report) => format!(
                "Exported {} trials to {}",
                report.records, report.destination
            ),
            Err(e) => format!("Export failed: {e}"),
        });
        self.log_summary();
    }

    pub fn scene(&self) -> Scene {
        let c = &self.controller;
        match c.phase() {
            TrialPhase::Idle => Scene::Menu {
                recorded: c.store().len(),
                can_export: self.can_export(),
            },
            TrialPhase::ArmedWaiting => Scene::Waiting,
            TrialPhase::ArmedReady | TrialPhase::Completed => {
                let stimulus = c
                    .current_stimulus()
                    .unwrap_or(reflex_core::StimulusVariant::Neutral);
                match c.last_reaction_ms() {
                    Some(reaction_ms) if c.phase().is_completed() => Scene::Result {
                        stimulus,
                        reaction_ms,
                        can_ignore: c.can_ignore_last(),
                        confirming_ignore: self.confirming_ignore,
                    },
                    _ => Scene::Stimulus(stimulus),
                }
            }
        }
    }

    pub fn title(&self) -> String {
        let c = &self.controller;
        match c.phase() {
            TrialPhase::Idle => match &self.status {
                Some(status) => format!("Reaction Time Test - {status}"),
                None => "Reaction Time Test".to_string(),
            },
            TrialPhase::ArmedWaiting => "Wait for the color change".to_string(),
            TrialPhase::ArmedReady => "Now!".to_string(),
            TrialPhase::Completed if self.confirming_ignore => {
                "Ignore this test? The data will be marked as ignored. [Y/N]".to_string()
            }
            TrialPhase::Completed => {
                let rt = c.last_reaction_ms().unwrap_or_default();
                match c.mode() {
                    Some(TrialMode::DryRun) => format!("Reaction Time: {rt:.2} ms (test run)"),
                    _ => format!("Reaction Time: {rt:.2} ms"),
                }
            }
        }
    }

    pub fn can_export(&self) -> bool {
        !self.controller.store().is_empty()
    }

    pub fn is_confirming_ignore(&self) -> bool {
        self.confirming_ignore
    }

    pub fn phase(&self) -> TrialPhase {
        self.controller.phase()
    }

    pub fn controller(&self) -> &TrialController<C, R> {
        &self.controller
    }

    pub fn clock(&self) -> &C {
        self.controller.clock()
    }

    pub fn log_summary(&self) {
        let store = self.controller.store();
        match store.summary() {
            Some(s) => info!(
                stored = store.len(),
                exportable = s.count,
                mean_ms = format_args!("{:.2}", s.mean_ms),
                min_ms = format_args!("{:.2}", s.min_ms),
                max_ms = format_args!("{:.2}", s.max_ms),
                "session results"
            ),
            None => info!(stored = store.len(), "no exportable results"),
        }
    }
}
