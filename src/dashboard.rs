//! The full dashboard: every panel mounted on one scheduler.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{IntervalsConfig, TwinConfig};
use crate::error::TwinResult;
use crate::panel::{mount, MountedPanel, Panel};
use crate::panels::{
    AiCenterPanel, ClimatePanel, HeaderPanel, ImmersivePanel, PassengerPanel, SecurityPanel,
    TrainPanel, TransportPanel,
};
use crate::random::SimRng;
use crate::scenario::console::SharedRng;
use crate::scenario::{Launch, Phase, RunId, ScenarioConsole, ScenarioSimulator};
use crate::scheduler::Scheduler;

/// Stream label for the simulator's completion rolls.
const SCENARIO_STREAM: &str = "scenario";

/// Point-in-time copy of every panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub taken_at: DateTime<Utc>,
    pub header: HeaderPanel,
    pub trains: TrainPanel,
    pub security: SecurityPanel,
    pub passengers: PassengerPanel,
    pub transport: TransportPanel,
    pub climate: ClimatePanel,
    pub immersive: ImmersivePanel,
    pub ai_center: AiCenterPanel,
}

/// A mounted dashboard. Dropping it stops every timer.
pub struct Dashboard {
    seed: u64,
    scheduler: Arc<dyn Scheduler>,
    header: MountedPanel<HeaderPanel>,
    trains: MountedPanel<TrainPanel>,
    security: MountedPanel<SecurityPanel>,
    passengers: MountedPanel<PassengerPanel>,
    transport: MountedPanel<TransportPanel>,
    climate: MountedPanel<ClimatePanel>,
    immersive: MountedPanel<ImmersivePanel>,
    console: ScenarioConsole,
}

fn mount_seeded<P: Panel>(scheduler: &dyn Scheduler, panel: P, interval_ms: u64, seed: u64) -> TwinResult<MountedPanel<P>> {
    mount(scheduler, panel, IntervalsConfig::ms(interval_ms), SimRng::for_stream(seed, P::NAME))
}

impl Dashboard {
    /// Validates `config` and mounts the header and all panels on
    /// `scheduler`. Each panel draws from its own stream of the seed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad config, or the scheduler's error
    /// if a timer cannot be registered. Panels mounted before the failure are
    /// unmounted again.
    pub fn mount(scheduler: Arc<dyn Scheduler>, config: &TwinConfig) -> TwinResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let now = scheduler.now();
        let iv = &config.intervals;
        let sched = scheduler.as_ref();

        let header = mount_seeded(sched, HeaderPanel::new(now), iv.header, seed)?;
        let trains = mount_seeded(sched, TrainPanel::default(), iv.trains, seed)?;
        let security = mount_seeded(
            sched,
            SecurityPanel::new(now, config.alerts.feed_policy()?),
            iv.security,
            seed,
        )?;
        let passengers = mount_seeded(sched, PassengerPanel::default(), iv.passengers, seed)?;
        let transport = mount_seeded(sched, TransportPanel::default(), iv.transport, seed)?;
        let climate = mount_seeded(sched, ClimatePanel::default(), iv.climate, seed)?;
        let immersive = mount_seeded(sched, ImmersivePanel::default(), iv.immersive, seed)?;

        let simulator = ScenarioSimulator::with_history_capacity(config.simulator.history_capacity)?;
        let ai_center = mount_seeded(sched, AiCenterPanel::new(simulator), iv.ai_metrics, seed)?;
        let rng: SharedRng = Arc::new(Mutex::new(SimRng::for_stream(seed, SCENARIO_STREAM)));
        let console = ScenarioConsole::new(ai_center, Arc::clone(&scheduler), &config.simulator, rng);

        tracing::info!(seed, "dashboard mounted");

        Ok(Self {
            seed,
            scheduler,
            header,
            trains,
            security,
            passengers,
            transport,
            climate,
            immersive,
            console,
        })
    }

    /// Seed actually in use, including one drawn from entropy.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.scheduler
    }

    pub fn snapshot(&self) -> TwinResult<DashboardSnapshot> {
        Ok(DashboardSnapshot {
            taken_at: self.scheduler.now(),
            header: self.header.snapshot()?,
            trains: self.trains.snapshot()?,
            security: self.security.snapshot()?,
            passengers: self.passengers.snapshot()?,
            transport: self.transport.snapshot()?,
            climate: self.climate.snapshot()?,
            immersive: self.immersive.snapshot()?,
            ai_center: self.console.panel().snapshot()?,
        })
    }

    /// Starts a scenario by id or name. See [`ScenarioConsole::launch`].
    pub fn launch(&mut self, scenario: &str) -> TwinResult<Launch> {
        self.console.launch(scenario)
    }

    pub fn cancel_scenario(&mut self) -> TwinResult<Option<RunId>> {
        self.console.cancel()
    }

    pub fn scenario_phase(&self) -> TwinResult<Phase> {
        self.console.phase()
    }

    #[must_use]
    pub fn trains(&self) -> &MountedPanel<TrainPanel> {
        &self.trains
    }

    #[must_use]
    pub fn security(&self) -> &MountedPanel<SecurityPanel> {
        &self.security
    }

    /// Stops every timer and returns the final state.
    pub fn unmount(self) -> TwinResult<DashboardSnapshot> {
        let taken_at = self.scheduler.now();
        let snapshot = DashboardSnapshot {
            taken_at,
            header: self.header.unmount()?,
            trains: self.trains.unmount()?,
            security: self.security.unmount()?,
            passengers: self.passengers.unmount()?,
            transport: self.transport.unmount()?,
            climate: self.climate.unmount()?,
            immersive: self.immersive.unmount()?,
            ai_center: self.console.unmount()?,
        };
        tracing::info!("dashboard unmounted");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::VirtualScheduler;
    use std::time::Duration;

    fn dashboard(seed: u64) -> (Arc<VirtualScheduler>, Dashboard) {
        let sched = Arc::new(VirtualScheduler::starting_at(DateTime::<Utc>::UNIX_EPOCH));
        let config = TwinConfig {
            seed: Some(seed),
            ..TwinConfig::default()
        };
        let dash = Dashboard::mount(Arc::clone(&sched) as Arc<dyn Scheduler>, &config).unwrap();
        (sched, dash)
    }

    #[test]
    fn header_clock_follows_scheduler() {
        let (sched, dash) = dashboard(1);
        sched.advance(Duration::from_secs(3)).unwrap();
        let snap = dash.snapshot().unwrap();
        assert_eq!(snap.header.current_time.timestamp(), 3);
        assert_eq!(snap.taken_at.timestamp(), 3);
    }

    #[test]
    fn same_seed_same_state() {
        let (s1, d1) = dashboard(9);
        let (s2, d2) = dashboard(9);
        s1.advance(Duration::from_secs(30)).unwrap();
        s2.advance(Duration::from_secs(30)).unwrap();
        let a = d1.snapshot().unwrap();
        let b = d2.snapshot().unwrap();
        assert_eq!(a.trains, b.trains);
        assert_eq!(a.climate, b.climate);
        assert_eq!(a.transport, b.transport);
        assert_eq!(d1.seed(), 9);
    }

    #[test]
    fn unmount_cancels_every_timer() {
        let (sched, mut dash) = dashboard(2);
        dash.launch("SIM004").unwrap();
        let last = dash.unmount().unwrap();
        assert_eq!(last.ai_center.simulator.phase(), Phase::Running);
        sched.advance(Duration::from_secs(60)).unwrap();
        assert_eq!(sched.pending().unwrap(), 0);
    }

    #[test]
    fn invalid_config_mounts_nothing() {
        let sched = Arc::new(VirtualScheduler::new());
        let mut config = TwinConfig::default();
        config.intervals.trains = 0;
        let err = Dashboard::mount(Arc::clone(&sched) as Arc<dyn Scheduler>, &config).err().unwrap();
        assert!(err.is_validation());
        assert_eq!(sched.pending().unwrap(), 0);
    }
}
