//! Climate monitoring: weather stations along the network and their
//! operational impacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mutator::{Perturb, RecordStore, Walk};
use crate::panel::Panel;
use crate::random::RandomSource;
use crate::style::{Icon, Presentable, StyleDescriptor, Tone};

pub const TEMPERATURE: Walk = Walk::new(1.0, 15.0, 35.0);
pub const HUMIDITY: Walk = Walk::new(2.5, 30.0, 90.0);
pub const WIND_SPEED: Walk = Walk::new(1.5, 0.0, 25.0);
pub const VISIBILITY: Walk = Walk::new(1.0, 1.0, 20.0);

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rain,
    Storm,
    Snow,
}

impl WeatherCondition {
    pub const ALL: [Self; 5] = [Self::Clear, Self::Cloudy, Self::Rain, Self::Storm, Self::Snow];
}

impl Presentable for WeatherCondition {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Clear => StyleDescriptor::new(Tone::Warning, Icon::Sun),
            Self::Cloudy => StyleDescriptor::new(Tone::Muted, Icon::Cloud),
            Self::Rain => StyleDescriptor::new(Tone::ClimateBlue, Icon::CloudRain),
            Self::Storm => StyleDescriptor::emphasized(Tone::Threat, Icon::Zap),
            Self::Snow => StyleDescriptor::new(Tone::ClimateBlue, Icon::Cloud),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::Rain => "Rain",
            Self::Storm => "Storm",
            Self::Snow => "Snow",
        }
    }
}

/// Temperature band used to colour a reading.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemperatureBand {
    Cold,
    Mild,
    Warm,
    Hot,
}

impl TemperatureBand {
    pub const ALL: [Self; 4] = [Self::Cold, Self::Mild, Self::Warm, Self::Hot];

    /// Bands a reading in degrees Celsius.
    #[must_use]
    pub fn of(celsius: f64) -> Self {
        if celsius < 10.0 {
            Self::Cold
        } else if celsius < 25.0 {
            Self::Mild
        } else if celsius < 30.0 {
            Self::Warm
        } else {
            Self::Hot
        }
    }
}

impl Presentable for TemperatureBand {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Cold => StyleDescriptor::new(Tone::ClimateBlue, Icon::Thermometer),
            Self::Mild => StyleDescriptor::new(Tone::ClimateGreen, Icon::Thermometer),
            Self::Warm => StyleDescriptor::new(Tone::Warning, Icon::Thermometer),
            Self::Hot => StyleDescriptor::new(Tone::Threat, Icon::Thermometer),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Cold => "COLD",
            Self::Mild => "MILD",
            Self::Warm => "WARM",
            Self::Hot => "HOT",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImpactKind {
    Temperature,
    Precipitation,
    Wind,
    Visibility,
}

impl ImpactKind {
    pub const ALL: [Self; 4] = [Self::Temperature, Self::Precipitation, Self::Wind, Self::Visibility];
}

impl Presentable for ImpactKind {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Temperature => StyleDescriptor::new(Tone::Warning, Icon::Thermometer),
            Self::Precipitation => StyleDescriptor::new(Tone::ClimateBlue, Icon::CloudRain),
            Self::Wind => StyleDescriptor::new(Tone::ClimateGreen, Icon::Wind),
            Self::Visibility => StyleDescriptor::new(Tone::Muted, Icon::Eye),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Precipitation => "Precipitation",
            Self::Wind => "Wind",
            Self::Visibility => "Visibility",
        }
    }
}

/// Impact severity on the three-level climate scale.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImpactSeverity {
    Low,
    Medium,
    High,
}

impl ImpactSeverity {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];
}

impl Presentable for ImpactSeverity {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Low => StyleDescriptor::new(Tone::ClimateGreen, Icon::Dot),
            Self::Medium => StyleDescriptor::new(Tone::Warning, Icon::AlertTriangle),
            Self::High => StyleDescriptor::emphasized(Tone::Threat, Icon::AlertTriangle),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherStation {
    pub location: String,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percent.
    pub humidity: f64,
    /// km/h
    pub wind_speed: f64,
    /// km
    pub visibility: f64,
    pub condition: WeatherCondition,
    pub alerts: Vec<String>,
}

impl WeatherStation {
    #[must_use]
    pub fn band(&self) -> TemperatureBand {
        TemperatureBand::of(self.temperature)
    }
}

impl Perturb for WeatherStation {
    fn perturbed(&self, rng: &mut dyn RandomSource) -> Self {
        Self {
            temperature: TEMPERATURE.apply(self.temperature, rng),
            humidity: HUMIDITY.apply(self.humidity, rng),
            wind_speed: WIND_SPEED.apply(self.wind_speed, rng),
            visibility: VISIBILITY.apply(self.visibility, rng),
            ..self.clone()
        }
    }
}

/// A standing climate effect on operations. Static.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateImpact {
    pub kind: ImpactKind,
    pub severity: ImpactSeverity,
    pub description: String,
    pub affected_routes: Vec<String>,
    pub recommendation: String,
}

fn station(
    location: &str,
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    visibility: f64,
    condition: WeatherCondition,
    alerts: &[&str],
) -> WeatherStation {
    WeatherStation {
        location: location.to_string(),
        temperature,
        humidity,
        wind_speed,
        visibility,
        condition,
        alerts: alerts.iter().map(|a| (*a).to_string()).collect(),
    }
}

#[must_use]
pub fn seed_stations() -> Vec<WeatherStation> {
    vec![
        station("Central District", 22.0, 65.0, 12.0, 10.0, WeatherCondition::Clear, &[]),
        station("East Route", 24.0, 58.0, 8.0, 15.0, WeatherCondition::Cloudy, &[]),
        station(
            "Metro Loop",
            28.0,
            72.0,
            15.0,
            8.0,
            WeatherCondition::Rain,
            &["Light rain expected until 3 PM"],
        ),
    ]
}

#[must_use]
pub fn seed_impacts() -> Vec<ClimateImpact> {
    vec![
        ClimateImpact {
            kind: ImpactKind::Temperature,
            severity: ImpactSeverity::Medium,
            description: "Elevated temperatures detected on South Express route".to_string(),
            affected_routes: vec!["South Express".to_string(), "Metro Loop".to_string()],
            recommendation: "Reduce speed by 10% to prevent track deformation".to_string(),
        },
        ClimateImpact {
            kind: ImpactKind::Precipitation,
            severity: ImpactSeverity::Low,
            description: "Light rainfall on eastern sections".to_string(),
            affected_routes: vec!["East Route".to_string()],
            recommendation: "Monitor brake performance and visibility".to_string(),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimatePanel {
    pub stations: RecordStore<WeatherStation>,
    pub impacts: Vec<ClimateImpact>,
}

impl Default for ClimatePanel {
    fn default() -> Self {
        Self {
            stations: RecordStore::new(seed_stations()),
            impacts: seed_impacts(),
        }
    }
}

impl ClimatePanel {
    /// Mean temperature across stations, `None` with no stations.
    #[must_use]
    pub fn average_temperature(&self) -> Option<f64> {
        if self.stations.is_empty() {
            return None;
        }
        let sum: f64 = self.stations.iter().map(|s| s.temperature).sum();
        Some(sum / self.stations.len() as f64)
    }

    /// Every active weather alert across stations, in station order.
    pub fn active_alerts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stations
            .iter()
            .flat_map(|s| s.alerts.iter().map(move |a| (s.location.as_str(), a.as_str())))
    }
}

impl Panel for ClimatePanel {
    const NAME: &'static str = "climate";

    fn on_tick(&mut self, rng: &mut dyn RandomSource, _now: DateTime<Utc>) {
        self.stations.tick(rng);
    }
}
