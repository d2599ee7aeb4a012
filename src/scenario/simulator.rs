//! Scenario simulator state machine.
//!
//! ```text
//! idle --begin--> running --reveal--> analyzing --complete--> idle
//!   ^                |                    |
//!   +-----cancel-----+--------------------+
//! ```
//!
//! At most one run is in flight. Every transition names the run it belongs
//! to, so a phase callback left over from a cancelled run finds a different
//! (or no) run and does nothing.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::random::RandomSource;

use super::{responses, seed_history, Scenario, SimulationResult, SimulationStatus};

/// Default number of completed runs kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Identifies one in-flight run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the simulator is in its cycle.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    Running,
    Analyzing,
}

/// Outcome of asking for a new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// The run was accepted.
    Started(RunId),
    /// Another run is in flight; nothing changed.
    Busy,
}

impl Launch {
    #[must_use]
    pub const fn run_id(&self) -> Option<RunId> {
        match self {
            Self::Started(id) => Some(*id),
            Self::Busy => None,
        }
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRun {
    pub run: RunId,
    pub scenario: Scenario,
    pub result: SimulationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSimulator {
    active: Option<ActiveRun>,
    /// Newest first.
    history: VecDeque<SimulationResult>,
    history_capacity: usize,
}

impl Default for ScenarioSimulator {
    fn default() -> Self {
        Self {
            active: None,
            history: seed_history().into(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl ScenarioSimulator {
    /// A simulator with the seeded history, keeping `history_capacity` runs.
    pub fn with_history_capacity(history_capacity: usize) -> Result<Self, ValidationError> {
        if history_capacity == 0 {
            return Err(ValidationError::ZeroCapacity {
                field: "simulator.history_capacity".to_string(),
            });
        }
        let mut sim = Self {
            history_capacity,
            ..Self::default()
        };
        sim.history.truncate(history_capacity);
        Ok(sim)
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.active.as_ref().map(|a| a.result.status) {
            None | Some(SimulationStatus::Completed) => Phase::Idle,
            Some(SimulationStatus::Running) => Phase::Running,
            Some(SimulationStatus::Analyzing) => Phase::Analyzing,
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveRun> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &VecDeque<SimulationResult> {
        &self.history
    }

    #[must_use]
    pub const fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a run of `scenario`. Rejected with [`Launch::Busy`] while
    /// another run is in flight.
    pub fn begin(&mut self, scenario: Scenario, now: DateTime<Utc>) -> Launch {
        if self.is_busy() {
            return Launch::Busy;
        }
        let run = RunId::new();
        let result = SimulationResult::started(&scenario, now);
        self.active = Some(ActiveRun {
            run,
            scenario,
            result,
        });
        Launch::Started(run)
    }

    /// Moves `run` from running to analyzing and reveals its responses.
    /// Returns false if `run` is not the current run or is past running.
    pub fn reveal(&mut self, run: RunId) -> bool {
        let Some(active) = self.active.as_mut().filter(|a| a.run == run) else {
            return false;
        };
        if active.result.status != SimulationStatus::Running {
            return false;
        }
        active.result.responses = revealed(&active.scenario);
        active.result.status = SimulationStatus::Analyzing;
        true
    }

    /// Finishes `run`: fills in execution time and mitigation, pushes the
    /// result onto the history and clears the in-flight slot.
    pub fn complete(&mut self, run: RunId, rng: &mut dyn RandomSource) -> Option<SimulationResult> {
        if self.active.as_ref().map(|a| a.run) != Some(run) {
            return None;
        }
        let ActiveRun { scenario, mut result, .. } = self.active.take()?;
        if result.responses.is_empty() {
            result.responses = revealed(&scenario);
        }
        result.execution_time_s = rng.uniform(1.0, 4.0);
        let mitigated = rng.uniform(80.0, 100.0).floor();
        result.impact_mitigation = format!("{mitigated:.0}% impact mitigated");
        result.status = SimulationStatus::Completed;

        self.history.push_front(result.clone());
        self.history.truncate(self.history_capacity);
        Some(result)
    }

    /// Drops the in-flight run without recording it.
    pub fn cancel(&mut self) -> Option<RunId> {
        self.active.take().map(|a| a.run)
    }
}

fn revealed(scenario: &Scenario) -> Vec<String> {
    responses(scenario.kind).iter().map(|r| (*r).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use crate::scenario::{find, MAINTENANCE_RESPONSES};

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn full_cycle() {
        let mut sim = ScenarioSimulator::default();
        assert_eq!(sim.phase(), Phase::Idle);

        let run = sim.begin(find("SIM004").unwrap(), now()).run_id().unwrap();
        assert_eq!(sim.phase(), Phase::Running);
        assert!(sim.active().unwrap().result.responses.is_empty());

        assert!(sim.reveal(run));
        assert_eq!(sim.phase(), Phase::Analyzing);
        assert_eq!(sim.active().unwrap().result.responses, MAINTENANCE_RESPONSES);
        assert!(!sim.reveal(run));

        // uniform(1,4) at 0.5 is 2.5; floor(uniform(80,100)) at 0.5 is 90.
        let mut rng = ScriptedRandom::constant(0.5);
        let done = sim.complete(run, &mut rng).unwrap();
        assert!((done.execution_time_s - 2.5).abs() < 1e-9);
        assert_eq!(done.impact_mitigation, "90% impact mitigated");
        assert_eq!(done.status, SimulationStatus::Completed);

        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.history().len(), 2);
        assert_eq!(sim.history()[0].scenario, "Emergency Maintenance");
    }

    #[test]
    fn second_launch_is_rejected() {
        let mut sim = ScenarioSimulator::default();
        let first = sim.begin(find("SIM001").unwrap(), now());
        assert!(!first.is_busy());
        assert_eq!(sim.begin(find("SIM002").unwrap(), now()), Launch::Busy);
        let run = first.run_id().unwrap();
        sim.reveal(run);
        assert_eq!(sim.begin(find("SIM002").unwrap(), now()), Launch::Busy);
        assert_eq!(sim.active().unwrap().scenario.id, "SIM001");
    }

    #[test]
    fn stale_run_is_ignored_after_cancel() {
        let mut sim = ScenarioSimulator::default();
        let old = sim.begin(find("SIM001").unwrap(), now()).run_id().unwrap();
        assert_eq!(sim.cancel(), Some(old));
        assert_eq!(sim.phase(), Phase::Idle);

        let new = sim.begin(find("SIM003").unwrap(), now()).run_id().unwrap();
        let mut rng = ScriptedRandom::constant(0.5);
        assert!(!sim.reveal(old));
        assert!(sim.complete(old, &mut rng).is_none());
        assert_eq!(sim.phase(), Phase::Running);
        assert!(sim.complete(new, &mut rng).is_some());
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn history_is_capped_newest_first() {
        let mut sim = ScenarioSimulator::default();
        let mut rng = ScriptedRandom::constant(0.5);
        for id in ["SIM001", "SIM002", "SIM003", "SIM004", "SIM001", "SIM002"] {
            let run = sim.begin(find(id).unwrap(), now()).run_id().unwrap();
            sim.reveal(run);
            sim.complete(run, &mut rng).unwrap();
        }
        let names: Vec<_> = sim.history().iter().map(|r| r.scenario.as_str()).collect();
        assert_eq!(
            names,
            [
                "Flood Alert - East Route",
                "Accident on T005",
                "Emergency Maintenance",
                "Cyberattack Attempt",
                "Flood Alert - East Route",
            ]
        );
    }

    #[test]
    fn zero_history_capacity_rejected() {
        assert!(ScenarioSimulator::with_history_capacity(0).is_err());
        let sim = ScenarioSimulator::with_history_capacity(1).unwrap();
        assert_eq!(sim.history().len(), 1);
    }

    #[test]
    fn mitigation_stays_in_range() {
        let mut sim = ScenarioSimulator::default();
        let mut rng = ScriptedRandom::constant(ScriptedRandom::MAX_UNIT);
        let run = sim.begin(find("SIM002").unwrap(), now()).run_id().unwrap();
        let done = sim.complete(run, &mut rng).unwrap();
        assert_eq!(done.impact_mitigation, "99% impact mitigated");
        assert!(done.execution_time_s < 4.0);
        // Completing straight from running still records the responses.
        assert_eq!(done.responses.len(), 5);
    }
}
