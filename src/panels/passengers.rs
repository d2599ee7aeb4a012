//! Passenger flow analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mutator::{Perturb, RecordStore, Walk};
use crate::panel::Panel;
use crate::random::RandomSource;
use crate::style::{Icon, Presentable, StyleDescriptor, Tone};

pub const TOTAL_PASSENGERS: Walk = Walk::new(10.0, 0.0, 100_000.0);
pub const AVERAGE_JOURNEY: Walk = Walk::new(1.0, 15.0, 40.0);
pub const SATISFACTION: Walk = Walk::new(0.05, 3.5, 5.0);
pub const DEMAND_NEXT_1H: Walk = Walk::new(50.0, 800.0, 5_000.0);
pub const DEMAND_NEXT_3H: Walk = Walk::new(100.0, 2_000.0, 12_000.0);
pub const DEMAND_NEXT_6H: Walk = Walk::new(150.0, 4_000.0, 24_000.0);

pub const INBOUND: Walk = Walk::new(10.0, 0.0, 400.0);
pub const OUTBOUND: Walk = Walk::new(7.5, 0.0, 400.0);
pub const PREDICTED_WAIT: Walk = Walk::new(0.5, 0.5, 30.0);
pub const PERSONA_SATISFACTION: Walk = Walk::new(0.1, 3.0, 5.0);

/// Combined in/out flow at which a station reads as fully loaded.
pub const STATION_FLOW_CAPACITY: f64 = 400.0;

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Crowding {
    Low,
    Medium,
    High,
    Critical,
}

impl Crowding {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

impl Presentable for Crowding {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Low => StyleDescriptor::new(Tone::Safe, Icon::Users),
            Self::Medium => StyleDescriptor::new(Tone::Warning, Icon::Users),
            Self::High => StyleDescriptor::new(Tone::Threat, Icon::Users),
            Self::Critical => StyleDescriptor::emphasized(Tone::Threat, Icon::AlertTriangle),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurgeKind {
    Concert,
    Sports,
    RushHour,
    Emergency,
}

impl SurgeKind {
    pub const ALL: [Self; 4] = [Self::Concert, Self::Sports, Self::RushHour, Self::Emergency];
}

impl Presentable for SurgeKind {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Concert => StyleDescriptor::new(Tone::Neural, Icon::Music),
            Self::Sports => StyleDescriptor::new(Tone::Primary, Icon::Trophy),
            Self::RushHour => StyleDescriptor::new(Tone::Warning, Icon::Clock),
            Self::Emergency => StyleDescriptor::emphasized(Tone::Threat, Icon::AlertTriangle),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Concert => "Concert",
            Self::Sports => "Sports",
            Self::RushHour => "Rush hour",
            Self::Emergency => "Emergency",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonaKind {
    Student,
    OfficeWorker,
    Tourist,
}

impl PersonaKind {
    pub const ALL: [Self; 3] = [Self::Student, Self::OfficeWorker, Self::Tourist];
}

impl Presentable for PersonaKind {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Student => StyleDescriptor::new(Tone::Primary, Icon::GraduationCap),
            Self::OfficeWorker => StyleDescriptor::new(Tone::Neural, Icon::Briefcase),
            Self::Tourist => StyleDescriptor::new(Tone::ClimateGreen, Icon::Coffee),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::OfficeWorker => "Office worker",
            Self::Tourist => "Tourist",
        }
    }
}

/// Demand forecast for the next hours.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandPrediction {
    pub next_1h: f64,
    pub next_3h: f64,
    pub next_6h: f64,
}

/// Network-wide passenger figures.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerMetrics {
    pub total_passengers: u32,
    pub peak_hour: String,
    pub average_journey_minutes: f64,
    pub satisfaction: f64,
    pub crowded_stations: Vec<String>,
    pub demand: DemandPrediction,
}

impl Default for PassengerMetrics {
    fn default() -> Self {
        Self {
            total_passengers: 8247,
            peak_hour: "08:30-09:30".to_string(),
            average_journey_minutes: 24.0,
            satisfaction: 4.2,
            crowded_stations: vec![
                "Central Station".to_string(),
                "Tech Hub".to_string(),
                "University".to_string(),
            ],
            demand: DemandPrediction {
                next_1h: 1250.0,
                next_3h: 3100.0,
                next_6h: 5600.0,
            },
        }
    }
}

impl PassengerMetrics {
    pub fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.total_passengers = TOTAL_PASSENGERS.apply_count(self.total_passengers, rng);
        self.average_journey_minutes = AVERAGE_JOURNEY.apply(self.average_journey_minutes, rng);
        self.satisfaction = SATISFACTION.apply(self.satisfaction, rng);
        self.demand.next_1h = DEMAND_NEXT_1H.apply(self.demand.next_1h, rng);
        self.demand.next_3h = DEMAND_NEXT_3H.apply(self.demand.next_3h, rng);
        self.demand.next_6h = DEMAND_NEXT_6H.apply(self.demand.next_6h, rng);
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerFlow {
    pub station: String,
    pub inbound: u32,
    pub outbound: u32,
    pub crowding: Crowding,
    /// Minutes.
    pub predicted_wait: f64,
}

impl PassengerFlow {
    /// Station load as a percentage of flow capacity, capped at 100.
    #[must_use]
    pub fn load_percent(&self) -> f64 {
        let flow = f64::from(self.inbound) + f64::from(self.outbound);
        (flow / STATION_FLOW_CAPACITY * 100.0).min(100.0)
    }
}

impl Perturb for PassengerFlow {
    fn perturbed(&self, rng: &mut dyn RandomSource) -> Self {
        Self {
            inbound: INBOUND.apply_count(self.inbound, rng),
            outbound: OUTBOUND.apply_count(self.outbound, rng),
            predicted_wait: PREDICTED_WAIT.apply(self.predicted_wait, rng),
            ..self.clone()
        }
    }
}

/// An expected crowd surge from a nearby event. Static.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerSurge {
    pub event: String,
    pub station: String,
    pub expected_surge: u32,
    pub time_to_impact: String,
    pub kind: SurgeKind,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommuterPersona {
    pub kind: PersonaKind,
    /// Share of riders, percent.
    pub percentage: u8,
    pub peak_hours: String,
    pub satisfaction: f64,
    pub behavior: String,
}

impl Perturb for CommuterPersona {
    fn perturbed(&self, rng: &mut dyn RandomSource) -> Self {
        Self {
            satisfaction: PERSONA_SATISFACTION.apply(self.satisfaction, rng),
            ..self.clone()
        }
    }
}

#[must_use]
pub fn seed_flows() -> Vec<PassengerFlow> {
    let flow = |station: &str, inbound, outbound, crowding, predicted_wait| PassengerFlow {
        station: station.to_string(),
        inbound,
        outbound,
        crowding,
        predicted_wait,
    };
    vec![
        flow("Central Station", 180, 95, Crowding::High, 4.5),
        flow("Tech Hub", 120, 85, Crowding::Medium, 2.3),
        flow("University", 200, 45, Crowding::Critical, 8.2),
        flow("Financial District", 85, 160, Crowding::Medium, 3.1),
        flow("Innovation Park", 60, 40, Crowding::Low, 1.2),
    ]
}

#[must_use]
pub fn seed_surges() -> Vec<PassengerSurge> {
    vec![
        PassengerSurge {
            event: "Tech Conference at Convention Center".to_string(),
            station: "University Station".to_string(),
            expected_surge: 500,
            time_to_impact: "15 mins".to_string(),
            kind: SurgeKind::Concert,
        },
        PassengerSurge {
            event: "Football Match Ending".to_string(),
            station: "Sports Complex".to_string(),
            expected_surge: 1200,
            time_to_impact: "45 mins".to_string(),
            kind: SurgeKind::Sports,
        },
    ]
}

#[must_use]
pub fn seed_personas() -> Vec<CommuterPersona> {
    let persona = |kind, percentage, peak_hours: &str, satisfaction, behavior: &str| CommuterPersona {
        kind,
        percentage,
        peak_hours: peak_hours.to_string(),
        satisfaction,
        behavior: behavior.to_string(),
    };
    vec![
        persona(PersonaKind::Student, 35, "8-9 AM, 4-6 PM", 4.1, "Price-sensitive, prefers off-peak"),
        persona(PersonaKind::OfficeWorker, 45, "7-9 AM, 5-7 PM", 3.8, "Time-critical, comfort-focused"),
        persona(PersonaKind::Tourist, 20, "10 AM-4 PM", 4.5, "Experience-focused, flexible timing"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerPanel {
    pub metrics: PassengerMetrics,
    pub flows: RecordStore<PassengerFlow>,
    pub surges: Vec<PassengerSurge>,
    pub personas: RecordStore<CommuterPersona>,
}

impl Default for PassengerPanel {
    fn default() -> Self {
        Self {
            metrics: PassengerMetrics::default(),
            flows: RecordStore::new(seed_flows()),
            surges: seed_surges(),
            personas: RecordStore::new(seed_personas()),
        }
    }
}

impl PassengerPanel {
    /// Station with the highest load, if any.
    #[must_use]
    pub fn busiest_station(&self) -> Option<&PassengerFlow> {
        self.flows
            .iter()
            .max_by(|a, b| a.load_percent().total_cmp(&b.load_percent()))
    }
}

impl Panel for PassengerPanel {
    const NAME: &'static str = "passengers";

    fn on_tick(&mut self, rng: &mut dyn RandomSource, _now: DateTime<Utc>) {
        self.metrics.tick(rng);
        self.flows.tick(rng);
        self.personas.tick(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SimRng};
    use crate::style::assert_all_defined;

    #[test]
    fn mappers_are_total() {
        assert_all_defined(&Crowding::ALL);
        assert_all_defined(&SurgeKind::ALL);
        assert_all_defined(&PersonaKind::ALL);
    }

    #[test]
    fn load_percent_caps_at_100() {
        let mut flow = seed_flows().remove(0);
        assert!((flow.load_percent() - 68.75).abs() < 1e-9);
        flow.inbound = 400;
        flow.outbound = 400;
        assert!((flow.load_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn busiest_station_at_seed() {
        let panel = PassengerPanel::default();
        assert_eq!(panel.busiest_station().unwrap().station, "Central Station");
    }

    #[test]
    fn floor_at_minimum() {
        let mut panel = PassengerPanel::default();
        let mut rng = ScriptedRandom::constant(0.0);
        for _ in 0..400 {
            panel.on_tick(&mut rng, Utc::now());
        }
        assert!((panel.metrics.satisfaction - 3.5).abs() < 1e-9);
        assert!((panel.metrics.demand.next_1h - 800.0).abs() < 1e-9);
        for f in &panel.flows {
            assert_eq!(f.inbound, 0);
            assert_eq!(f.outbound, 0);
            assert!((f.predicted_wait - 0.5).abs() < 1e-9);
        }
        for p in &panel.personas {
            assert!((p.satisfaction - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn random_ticks_stay_in_domain() {
        let mut panel = PassengerPanel::default();
        let mut rng = SimRng::from_seed_u64(5);
        for _ in 0..1000 {
            panel.on_tick(&mut rng, Utc::now());
            let m = &panel.metrics;
            assert!(TOTAL_PASSENGERS.bounds().contains(f64::from(m.total_passengers)));
            assert!(AVERAGE_JOURNEY.bounds().contains(m.average_journey_minutes));
            assert!(SATISFACTION.bounds().contains(m.satisfaction));
            assert!(DEMAND_NEXT_1H.bounds().contains(m.demand.next_1h));
            assert!(DEMAND_NEXT_3H.bounds().contains(m.demand.next_3h));
            assert!(DEMAND_NEXT_6H.bounds().contains(m.demand.next_6h));
            for f in &panel.flows {
                assert!(f.inbound <= 400 && f.outbound <= 400);
                assert!(PREDICTED_WAIT.bounds().contains(f.predicted_wait));
                assert!(f.load_percent() <= 100.0);
            }
        }
        assert_eq!(panel.flows.len(), 5);
        assert_eq!(panel.surges, seed_surges());
        let shares: u32 = panel.personas.iter().map(|p| u32::from(p.percentage)).sum();
        assert_eq!(shares, 100);
    }
}
