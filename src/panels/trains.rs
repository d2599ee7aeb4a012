//! Real-time train monitoring panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mutator::{Perturb, RecordStore, Walk};
use crate::panel::Panel;
use crate::random::RandomSource;
use crate::style::{Icon, Presentable, StyleDescriptor, Tone};

/// Seats per train, used for occupancy.
pub const TRAIN_CAPACITY: u32 = 240;

/// Speed drift per tick while on time.
pub const SPEED: Walk = Walk::new(5.0, 0.0, 160.0);
/// Boarding/alighting drift per tick unless in maintenance.
pub const PASSENGERS: Walk = Walk::new(10.0, 0.0, TRAIN_CAPACITY as f64);

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainStatus {
    OnTime,
    Delayed,
    Maintenance,
}

impl TrainStatus {
    pub const ALL: [Self; 3] = [Self::OnTime, Self::Delayed, Self::Maintenance];
}

impl Presentable for TrainStatus {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::OnTime => StyleDescriptor::new(Tone::Safe, Icon::CheckCircle),
            Self::Delayed => StyleDescriptor::new(Tone::Warning, Icon::AlertTriangle),
            Self::Maintenance => StyleDescriptor::new(Tone::Threat, Icon::AlertTriangle),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::OnTime => "ON TIME",
            Self::Delayed => "DELAYED",
            Self::Maintenance => "MAINTENANCE",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Train {
    pub id: String,
    pub line: String,
    pub location: String,
    /// km/h
    pub speed: f64,
    pub passengers: u32,
    pub status: TrainStatus,
    pub next_stop: String,
    pub eta: String,
}

impl Train {
    /// Share of seats taken, in `[0, 1]`.
    #[must_use]
    pub fn occupancy(&self) -> f64 {
        f64::from(self.passengers.min(TRAIN_CAPACITY)) / f64::from(TRAIN_CAPACITY)
    }
}

impl Perturb for Train {
    fn perturbed(&self, rng: &mut dyn RandomSource) -> Self {
        let speed = match self.status {
            TrainStatus::OnTime => SPEED.apply(self.speed, rng),
            TrainStatus::Delayed | TrainStatus::Maintenance => self.speed,
        };
        let passengers = match self.status {
            TrainStatus::OnTime | TrainStatus::Delayed => PASSENGERS.apply_count(self.passengers, rng),
            TrainStatus::Maintenance => self.passengers,
        };
        Self {
            speed,
            passengers,
            ..self.clone()
        }
    }
}

fn train(id: &str, line: &str, location: &str, speed: f64, passengers: u32, status: TrainStatus, next_stop: &str, eta: &str) -> Train {
    Train {
        id: id.to_string(),
        line: line.to_string(),
        location: location.to_string(),
        speed,
        passengers,
        status,
        next_stop: next_stop.to_string(),
        eta: eta.to_string(),
    }
}

/// The four trains the panel starts with.
#[must_use]
pub fn seed_trains() -> Vec<Train> {
    vec![
        train("T001", "Central Line", "Station District", 65.0, 180, TrainStatus::OnTime, "Tech Hub", "3 min"),
        train("T005", "East Route", "Innovation Park", 72.0, 156, TrainStatus::OnTime, "University", "5 min"),
        train("T012", "Metro Loop", "City Center", 0.0, 89, TrainStatus::Delayed, "Financial District", "12 min"),
        train("T018", "South Express", "Maintenance Depot", 0.0, 0, TrainStatus::Maintenance, "Service Complete", "45 min"),
    ]
}

/// Train monitoring panel state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainPanel {
    pub trains: RecordStore<Train>,
}

impl Default for TrainPanel {
    fn default() -> Self {
        Self::new(seed_trains())
    }
}

impl TrainPanel {
    #[must_use]
    pub fn new(trains: Vec<Train>) -> Self {
        Self {
            trains: RecordStore::new(trains),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }
}

impl Panel for TrainPanel {
    const NAME: &'static str = "trains";

    fn on_tick(&mut self, rng: &mut dyn RandomSource, _now: DateTime<Utc>) {
        self.trains.tick(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SimRng};
    use crate::style::assert_all_defined;

    #[test]
    fn rules_are_valid() {
        SPEED.validate().unwrap();
        PASSENGERS.validate().unwrap();
    }

    #[test]
    fn status_styles_are_defined() {
        assert_all_defined(&TrainStatus::ALL);
    }

    #[test]
    fn maintenance_train_is_frozen() {
        let t = &seed_trains()[3];
        let mut rng = ScriptedRandom::constant(0.9);
        assert_eq!(&t.perturbed(&mut rng), t);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn delayed_train_keeps_speed_but_boards() {
        let t = &seed_trains()[2];
        let mut rng = ScriptedRandom::constant(0.9);
        let next = t.perturbed(&mut rng);
        assert!(next.speed.abs() < f64::EPSILON);
        // symmetric(10) at 0.9 is +8.
        assert_eq!(next.passengers, 97);
    }

    #[test]
    fn on_time_train_stays_in_domain() {
        let mut panel = TrainPanel::default();
        let mut rng = SimRng::from_seed_u64(3);
        for _ in 0..1000 {
            panel.on_tick(&mut rng, Utc::now());
            for t in &panel.trains {
                assert!(SPEED.bounds().contains(t.speed));
                assert!(t.passengers <= TRAIN_CAPACITY);
                assert!((0.0..=1.0).contains(&t.occupancy()));
            }
        }
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&TrainStatus::OnTime).unwrap();
        assert_eq!(json, "\"on-time\"");
    }
}
