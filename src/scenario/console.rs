//! Operator console for the scenario simulator.
//!
//! Launching a run schedules both phase transitions on the dashboard's
//! scheduler at once: the reveal after the running delay and the completion
//! after running plus analyzing. The console owns both timer handles, so
//! cancelling (or dropping the console) stops them.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::SimulatorConfig;
use crate::error::{TwinError, TwinResult};
use crate::panel::{lock_panel, MountedPanel, SharedPanel};
use crate::panels::AiCenterPanel;
use crate::random::RandomSource;
use crate::scheduler::{Scheduler, TimerHandle};

use super::simulator::{Launch, Phase, RunId};
use super::{find, SimulationResult};

/// Shared generator used to roll completion figures.
pub type SharedRng = Arc<Mutex<dyn RandomSource>>;

struct PendingRun {
    run: RunId,
    _reveal: TimerHandle,
    _complete: TimerHandle,
}

/// Drives the AI centre panel's simulator from user actions.
pub struct ScenarioConsole {
    panel: MountedPanel<AiCenterPanel>,
    scheduler: Arc<dyn Scheduler>,
    rng: SharedRng,
    running: Duration,
    analyzing: Duration,
    pending: Option<PendingRun>,
}

impl ScenarioConsole {
    #[must_use]
    pub fn new(
        panel: MountedPanel<AiCenterPanel>,
        scheduler: Arc<dyn Scheduler>,
        timings: &SimulatorConfig,
        rng: SharedRng,
    ) -> Self {
        Self {
            panel,
            scheduler,
            rng,
            running: timings.running(),
            analyzing: timings.analyzing(),
            pending: None,
        }
    }

    #[must_use]
    pub fn panel(&self) -> &MountedPanel<AiCenterPanel> {
        &self.panel
    }

    pub fn phase(&self) -> TwinResult<Phase> {
        self.panel.with(|p| p.simulator.phase())
    }

    /// Starts the scenario with id or name `key`.
    ///
    /// Returns [`Launch::Busy`] without scheduling anything while a run is
    /// in flight.
    ///
    /// # Errors
    ///
    /// `ValidationError::UnknownScenario` if `key` is not in the catalog, or
    /// the scheduler's error if a phase timer cannot be registered. In the
    /// latter case the run is cancelled again.
    pub fn launch(&mut self, key: &str) -> TwinResult<Launch> {
        let scenario = find(key)?;
        let name = scenario.name.clone();
        let now = self.scheduler.now();
        let launch = self.panel.with_mut(|p| p.simulator.begin(scenario, now))?;

        let Launch::Started(run) = launch else {
            tracing::warn!(scenario = %name, "simulation already in flight, launch ignored");
            return Ok(Launch::Busy);
        };

        match self.arm(run) {
            Ok(pending) => {
                self.pending = Some(pending);
                tracing::info!(scenario = %name, %run, "simulation running");
                Ok(launch)
            }
            Err(e) => {
                self.panel.with_mut(|p| p.simulator.cancel())?;
                Err(e)
            }
        }
    }

    /// Abandons the in-flight run, if any. Its phase timers are cancelled and
    /// nothing is added to the history.
    pub fn cancel(&mut self) -> TwinResult<Option<RunId>> {
        self.pending = None;
        let cancelled = self.panel.with_mut(|p| p.simulator.cancel())?;
        if let Some(run) = cancelled {
            tracing::info!(%run, "simulation cancelled");
        }
        Ok(cancelled)
    }

    /// The in-flight run whose phase timers the console still owns.
    ///
    /// Timers of a run that has already completed are released here, so a
    /// finished run never reads as pending.
    pub fn pending_run(&mut self) -> TwinResult<Option<RunId>> {
        let active = self.panel.with(|p| p.simulator.active().map(|a| a.run))?;
        if self.pending.as_ref().is_some_and(|p| Some(p.run) != active) {
            self.pending = None;
        }
        Ok(self.pending.as_ref().map(|p| p.run))
    }

    /// Stops the metrics timer and any pending phases, returning the final
    /// panel state.
    pub fn unmount(self) -> TwinResult<AiCenterPanel> {
        let Self { panel, pending, .. } = self;
        drop(pending);
        panel.unmount()
    }

    fn arm(&self, run: RunId) -> TwinResult<PendingRun> {
        let reveal_state = self.panel.shared();
        let reveal = self.scheduler.schedule_once(
            self.running,
            Box::new(move |_ctx| reveal_phase(&reveal_state, run)),
        )?;

        let complete_state = self.panel.shared();
        let rng = Arc::clone(&self.rng);
        let complete = self.scheduler.schedule_once(
            self.running.saturating_add(self.analyzing),
            Box::new(move |_ctx| complete_phase(&complete_state, &rng, run)),
        )?;

        Ok(PendingRun {
            run,
            _reveal: reveal,
            _complete: complete,
        })
    }
}

fn reveal_phase(state: &SharedPanel<AiCenterPanel>, run: RunId) {
    match lock_panel(state) {
        Ok(mut panel) => {
            if panel.simulator.reveal(run) {
                tracing::info!(%run, "simulation analyzing");
            }
        }
        Err(e) => tracing::warn!(%run, error = %e, "reveal skipped"),
    }
}

fn complete_phase(state: &SharedPanel<AiCenterPanel>, rng: &SharedRng, run: RunId) {
    let finished = lock_panel(state).and_then(|mut panel| {
        let mut rng = rng.lock().map_err(|_| TwinError::poisoned("scenario rng"))?;
        Ok(panel.simulator.complete(run, &mut *rng))
    });
    match finished {
        Ok(Some(SimulationResult {
            scenario,
            impact_mitigation,
            execution_time_s,
            ..
        })) => {
            tracing::info!(%run, %scenario, execution_time_s, %impact_mitigation, "simulation completed");
        }
        Ok(None) => tracing::debug!(%run, "stale completion ignored"),
        Err(e) => tracing::warn!(%run, error = %e, "completion skipped"),
    }
}
