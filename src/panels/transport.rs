//! Multi-modal transport ecosystem: trains, buses, metro and EV charging
//! behind one panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mutator::{Accumulate, Bounds, Perturb, RecordStore, Walk};
use crate::panel::Panel;
use crate::random::RandomSource;
use crate::style::{Icon, Presentable, StyleDescriptor, Tone};

/// Load drift per tick. The domain is `[0, capacity]` of each mode.
pub const CURRENT_LOAD: Walk = Walk::new(10.0, 0.0, 0.0);
pub const EFFICIENCY: Walk = Walk::new(1.5, 70.0, 100.0);

pub const ECOSYSTEM_PASSENGERS: Walk = Walk::new(25.0, 0.0, 200_000.0);
pub const TRANSFER_TIME: Walk = Walk::new(0.15, 2.0, 6.0);
pub const SYSTEM_EFFICIENCY: Walk = Walk::new(0.5, 80.0, 95.0);
pub const CARBON_REDUCTION: Accumulate = Accumulate::new(2.0);

pub const CARBON_DAILY: Accumulate = Accumulate::new(5.0);
pub const CARBON_WEEKLY: Accumulate = Accumulate::new(20.0);
pub const MONTHLY_GROWTH: Walk = Walk::new(0.5, 8.0, 20.0);

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeKind {
    Train,
    Bus,
    Metro,
    EvCharging,
}

impl ModeKind {
    pub const ALL: [Self; 4] = [Self::Train, Self::Bus, Self::Metro, Self::EvCharging];
}

impl Presentable for ModeKind {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Train => StyleDescriptor::new(Tone::Primary, Icon::Train),
            Self::Bus => StyleDescriptor::new(Tone::ClimateGreen, Icon::Bus),
            Self::Metro => StyleDescriptor::new(Tone::Neural, Icon::Train),
            Self::EvCharging => StyleDescriptor::new(Tone::Warning, Icon::Zap),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Train => "Train",
            Self::Bus => "Bus",
            Self::Metro => "Metro",
            Self::EvCharging => "EV Charging",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeStatus {
    Operational,
    Delayed,
    Maintenance,
    Offline,
}

impl ModeStatus {
    pub const ALL: [Self; 4] = [Self::Operational, Self::Delayed, Self::Maintenance, Self::Offline];
}

impl Presentable for ModeStatus {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Operational => StyleDescriptor::new(Tone::Safe, Icon::CheckCircle),
            Self::Delayed => StyleDescriptor::new(Tone::Warning, Icon::Clock),
            Self::Maintenance => StyleDescriptor::new(Tone::Warning, Icon::Wrench),
            Self::Offline => StyleDescriptor::emphasized(Tone::Threat, Icon::AlertTriangle),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Operational => "OPERATIONAL",
            Self::Delayed => "DELAYED",
            Self::Maintenance => "MAINTENANCE",
            Self::Offline => "OFFLINE",
        }
    }
}

/// How full a mode is relative to its capacity.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadBand {
    Light,
    Busy,
    Saturated,
}

impl LoadBand {
    pub const ALL: [Self; 3] = [Self::Light, Self::Busy, Self::Saturated];

    /// Bands a load percentage: below 50 light, below 80 busy.
    #[must_use]
    pub fn of(percent: f64) -> Self {
        if percent < 50.0 {
            Self::Light
        } else if percent < 80.0 {
            Self::Busy
        } else {
            Self::Saturated
        }
    }
}

impl Presentable for LoadBand {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Light => StyleDescriptor::new(Tone::Safe, Icon::Users),
            Self::Busy => StyleDescriptor::new(Tone::Warning, Icon::Users),
            Self::Saturated => StyleDescriptor::new(Tone::Threat, Icon::Users),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Light => "LIGHT",
            Self::Busy => "BUSY",
            Self::Saturated => "SATURATED",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportMode {
    pub kind: ModeKind,
    pub id: String,
    pub name: String,
    pub status: ModeStatus,
    pub capacity: u32,
    pub current_load: u32,
    /// Percent.
    pub efficiency: f64,
    pub location: String,
    pub next_update: String,
}

impl TransportMode {
    /// Load walk bounded by this mode's own capacity.
    #[must_use]
    pub fn load_walk(&self) -> Walk {
        CURRENT_LOAD.with_bounds(Bounds::new(0.0, f64::from(self.capacity)))
    }

    /// Load as a percentage of capacity. A zero-capacity mode reads as full.
    #[must_use]
    pub fn load_percent(&self) -> f64 {
        if self.capacity == 0 {
            return 100.0;
        }
        f64::from(self.current_load) / f64::from(self.capacity) * 100.0
    }

    #[must_use]
    pub fn load_band(&self) -> LoadBand {
        LoadBand::of(self.load_percent())
    }
}

impl Perturb for TransportMode {
    fn perturbed(&self, rng: &mut dyn RandomSource) -> Self {
        Self {
            current_load: self.load_walk().apply_count(self.current_load, rng),
            efficiency: EFFICIENCY.apply(self.efficiency, rng),
            ..self.clone()
        }
    }
}

/// A multi-modal corridor. Static.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityRoute {
    pub route: String,
    pub modes: Vec<String>,
    /// Minutes.
    pub transfer_time: f64,
    pub efficiency: u32,
    pub passenger_flow: u32,
    /// kg CO2.
    pub carbon_saved: f64,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisruptionStatus {
    Active,
    Mitigated,
    Resolved,
}

impl DisruptionStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Mitigated, Self::Resolved];
}

impl Presentable for DisruptionStatus {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Active => StyleDescriptor::emphasized(Tone::Threat, Icon::AlertTriangle),
            Self::Mitigated => StyleDescriptor::new(Tone::Warning, Icon::Brain),
            Self::Resolved => StyleDescriptor::new(Tone::Safe, Icon::CheckCircle),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Mitigated => "MITIGATED",
            Self::Resolved => "RESOLVED",
        }
    }
}

/// A service disruption and the automatic response to it. Static.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disruption {
    pub mode: String,
    pub issue: String,
    pub delay: String,
    pub ai_response: String,
    pub status: DisruptionStatus,
    pub affected_passengers: u32,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcosystemMetrics {
    pub total_passengers: u32,
    pub average_transfer_minutes: f64,
    pub system_efficiency: f64,
    /// kg CO2, monotonic.
    pub carbon_reduction: f64,
    pub energy_optimization: f64,
}

impl Default for EcosystemMetrics {
    fn default() -> Self {
        Self {
            total_passengers: 15_680,
            average_transfer_minutes: 3.2,
            system_efficiency: 88.5,
            carbon_reduction: 1247.8,
            energy_optimization: 94.0,
        }
    }
}

impl EcosystemMetrics {
    pub fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.total_passengers = ECOSYSTEM_PASSENGERS.apply_count(self.total_passengers, rng);
        self.average_transfer_minutes = TRANSFER_TIME.apply(self.average_transfer_minutes, rng);
        self.system_efficiency = SYSTEM_EFFICIENCY.apply(self.system_efficiency, rng);
        self.carbon_reduction = CARBON_REDUCTION.apply(self.carbon_reduction, rng);
    }
}

/// Carbon savings over time. `daily` and `weekly` only grow.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonTrend {
    pub daily: f64,
    pub weekly: f64,
    /// Percent.
    pub monthly_growth: f64,
    pub yearly_projection: f64,
}

impl Default for CarbonTrend {
    fn default() -> Self {
        Self {
            daily: 1247.8,
            weekly: 8935.4,
            monthly_growth: 12.5,
            yearly_projection: 156_420.0,
        }
    }
}

impl CarbonTrend {
    pub fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.daily = CARBON_DAILY.apply(self.daily, rng);
        self.weekly = CARBON_WEEKLY.apply(self.weekly, rng);
        self.monthly_growth = MONTHLY_GROWTH.apply(self.monthly_growth, rng);
    }
}

#[must_use]
pub fn seed_modes() -> Vec<TransportMode> {
    let mode = |kind, id: &str, name: &str, status, capacity, current_load, efficiency, location: &str, next_update: &str| {
        TransportMode {
            kind,
            id: id.to_string(),
            name: name.to_string(),
            status,
            capacity,
            current_load,
            efficiency,
            location: location.to_string(),
            next_update: next_update.to_string(),
        }
    };
    vec![
        mode(ModeKind::Train, "T-CENTRAL", "Central Line Express", ModeStatus::Operational, 1200, 856, 94.0, "Downtown Hub", "2 min"),
        mode(ModeKind::Bus, "B-LOOP", "Smart Bus Loop", ModeStatus::Operational, 80, 45, 87.0, "University District", "4 min"),
        mode(ModeKind::Metro, "M-EAST", "East Metro Line", ModeStatus::Delayed, 800, 234, 76.0, "Tech Corridor", "8 min"),
        mode(ModeKind::EvCharging, "EV-HUB1", "Central Charging Hub", ModeStatus::Operational, 24, 16, 92.0, "Transport Center", "1 min"),
    ]
}

#[must_use]
pub fn seed_routes() -> Vec<ConnectivityRoute> {
    let route = |route: &str, modes: &[&str], transfer_time, efficiency, passenger_flow, carbon_saved| ConnectivityRoute {
        route: route.to_string(),
        modes: modes.iter().map(|m| (*m).to_string()).collect(),
        transfer_time,
        efficiency,
        passenger_flow,
        carbon_saved,
    };
    vec![
        route("Downtown ↔ University", &["Train", "Bus", "Metro"], 3.5, 89, 2340, 145.2),
        route("Tech Hub ↔ Financial", &["Train", "EV Shuttle"], 2.1, 92, 1890, 98.7),
        route("Airport ↔ City Center", &["Metro", "Bus", "Train"], 4.2, 85, 3120, 189.5),
    ]
}

#[must_use]
pub fn seed_disruptions() -> Vec<Disruption> {
    vec![Disruption {
        mode: "M-EAST Metro".to_string(),
        issue: "Signal malfunction".to_string(),
        delay: "10 min".to_string(),
        ai_response: "Extra Smart Bus Loop deployed automatically".to_string(),
        status: DisruptionStatus::Mitigated,
        affected_passengers: 800,
    }]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportPanel {
    pub modes: RecordStore<TransportMode>,
    pub routes: Vec<ConnectivityRoute>,
    pub disruptions: Vec<Disruption>,
    pub ecosystem: EcosystemMetrics,
    pub carbon: CarbonTrend,
}

impl Default for TransportPanel {
    fn default() -> Self {
        Self {
            modes: RecordStore::new(seed_modes()),
            routes: seed_routes(),
            disruptions: seed_disruptions(),
            ecosystem: EcosystemMetrics::default(),
            carbon: CarbonTrend::default(),
        }
    }
}

impl TransportPanel {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TransportMode> {
        self.modes.iter().find(|m| m.id == id)
    }
}

impl Panel for TransportPanel {
    const NAME: &'static str = "transport";

    fn on_tick(&mut self, rng: &mut dyn RandomSource, _now: DateTime<Utc>) {
        self.modes.tick(rng);
        self.ecosystem.tick(rng);
        self.carbon.tick(rng);
    }
}
