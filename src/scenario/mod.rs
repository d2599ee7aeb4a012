//! Disruption scenarios and the canned responses the simulator reveals.
//!
//! The response table is keyed by [`ScenarioKind`] through an exhaustive
//! match. `Surge` has no list of its own and borrows the accident list, and
//! so does any category string that does not parse.

pub mod console;
pub mod simulator;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::style::{Icon, Presentable, Severity, StyleDescriptor, Tone};

pub use console::ScenarioConsole;
pub use simulator::{Launch, Phase, RunId, ScenarioSimulator};

/// Number of responses revealed for every scenario.
pub const RESPONSES_PER_SCENARIO: usize = 5;

/// Canned operator responses for one scenario kind, in reveal order. The text
/// is kept verbatim except for the leading emoji, which is dropped.
pub type ResponseList = [&'static str; RESPONSES_PER_SCENARIO];

pub const ACCIDENT_RESPONSES: ResponseList = [
    "Emergency protocols activated immediately",
    "Emergency bus fleet deployed to maintain service",
    "Real-time passenger notifications sent",
    "Emergency services coordination initiated",
    "Dynamic route optimization activated",
];

pub const FLOOD_RESPONSES: ResponseList = [
    "Weather monitoring systems activated",
    "Alternative underground routes prioritized",
    "Power systems switched to flood-safe mode",
    "Early evacuation procedures initiated",
    "Infrastructure protection measures deployed",
];

pub const CYBERATTACK_RESPONSES: ResponseList = [
    "All systems immediately isolated",
    "Backup security protocols activated",
    "AI threat analysis initiated",
    "Manual override systems engaged",
    "Secure communication channels established",
];

pub const MAINTENANCE_RESPONSES: ResponseList = [
    "Predictive maintenance schedule optimized",
    "Temporary transport alternatives deployed",
    "Capacity reallocation algorithms activated",
    "Maintenance window optimized for minimal impact",
    "Passenger journey replanning initiated",
];

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    Accident,
    Flood,
    Cyberattack,
    Maintenance,
    Surge,
}

impl ScenarioKind {
    pub const ALL: [Self; 5] = [
        Self::Accident,
        Self::Flood,
        Self::Cyberattack,
        Self::Maintenance,
        Self::Surge,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accident => "accident",
            Self::Flood => "flood",
            Self::Cyberattack => "cyberattack",
            Self::Maintenance => "maintenance",
            Self::Surge => "surge",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownScenario { id: s.to_string() })
    }
}

impl Presentable for ScenarioKind {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Accident => StyleDescriptor::new(Tone::Threat, Icon::AlertTriangle),
            Self::Flood => StyleDescriptor::new(Tone::ClimateBlue, Icon::CloudRain),
            Self::Cyberattack => StyleDescriptor::new(Tone::Threat, Icon::Shield),
            Self::Maintenance => StyleDescriptor::new(Tone::Warning, Icon::Wrench),
            Self::Surge => StyleDescriptor::new(Tone::Neural, Icon::Users),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Accident => "Accident",
            Self::Flood => "Flood",
            Self::Cyberattack => "Cyberattack",
            Self::Maintenance => "Maintenance",
            Self::Surge => "Passenger surge",
        }
    }
}

/// Canned responses for `kind`, in reveal order.
#[must_use]
pub const fn responses(kind: ScenarioKind) -> &'static ResponseList {
    match kind {
        ScenarioKind::Accident => &ACCIDENT_RESPONSES,
        ScenarioKind::Flood => &FLOOD_RESPONSES,
        ScenarioKind::Cyberattack => &CYBERATTACK_RESPONSES,
        ScenarioKind::Maintenance => &MAINTENANCE_RESPONSES,
        // No dedicated list.
        ScenarioKind::Surge => &ACCIDENT_RESPONSES,
    }
}

/// Responses for a free-form category string. Unknown categories get the
/// accident list.
#[must_use]
pub fn responses_for_category(category: &str) -> &'static ResponseList {
    match category.parse::<ScenarioKind>() {
        Ok(kind) => responses(kind),
        Err(_) => {
            tracing::debug!(category, "unknown scenario category, using accident responses");
            &ACCIDENT_RESPONSES
        }
    }
}

/// A disruption the operator can simulate.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: ScenarioKind,
    pub severity: Severity,
    pub estimated_impact: String,
}

/// The scenarios offered by the AI centre, in display order.
#[must_use]
pub fn catalog() -> Vec<Scenario> {
    let scenario = |id: &str, name: &str, description: &str, kind, severity, estimated_impact: &str| Scenario {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        kind,
        severity,
        estimated_impact: estimated_impact.to_string(),
    };
    vec![
        scenario(
            "SIM001",
            "Accident on T005",
            "Simulate train collision on East Route during peak hours",
            ScenarioKind::Accident,
            Severity::Critical,
            "2,500 passengers affected",
        ),
        scenario(
            "SIM002",
            "Flood Alert - East Route",
            "Heavy rainfall flooding tracks and stations",
            ScenarioKind::Flood,
            Severity::High,
            "4 stations offline, 3,200 passengers",
        ),
        scenario(
            "SIM003",
            "Cyberattack Attempt",
            "Coordinated attack on control systems",
            ScenarioKind::Cyberattack,
            Severity::Critical,
            "Network-wide security protocols",
        ),
        scenario(
            "SIM004",
            "Emergency Maintenance",
            "Critical infrastructure failure requiring immediate response",
            ScenarioKind::Maintenance,
            Severity::Medium,
            "Central Line capacity reduced 40%",
        ),
    ]
}

/// Looks a scenario up by id (`SIM00x`) or by exact name.
pub fn find(key: &str) -> Result<Scenario, ValidationError> {
    catalog()
        .into_iter()
        .find(|s| s.id == key || s.name == key)
        .ok_or_else(|| ValidationError::UnknownScenario { id: key.to_string() })
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationStatus {
    Running,
    Analyzing,
    Completed,
}

impl SimulationStatus {
    pub const ALL: [Self; 3] = [Self::Running, Self::Analyzing, Self::Completed];
}

impl Presentable for SimulationStatus {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Running => StyleDescriptor::emphasized(Tone::Neural, Icon::Brain),
            Self::Analyzing => StyleDescriptor::emphasized(Tone::Warning, Icon::Brain),
            Self::Completed => StyleDescriptor::new(Tone::Safe, Icon::CheckCircle),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Analyzing => "ANALYZING",
            Self::Completed => "COMPLETED",
        }
    }
}

/// One simulation run, in flight or finished.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub id: String,
    /// Scenario name.
    pub scenario: String,
    pub responses: Vec<String>,
    /// Seconds; zero until completed.
    pub execution_time_s: f64,
    pub status: SimulationStatus,
    pub impact_mitigation: String,
}

impl SimulationResult {
    /// A fresh run for `scenario` started at `now`.
    #[must_use]
    pub fn started(scenario: &Scenario, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("RES{}", now.timestamp_millis()),
            scenario: scenario.name.clone(),
            responses: Vec::new(),
            execution_time_s: 0.0,
            status: SimulationStatus::Running,
            impact_mitigation: "Calculating...".to_string(),
        }
    }
}

/// History entry present before any run.
#[must_use]
pub fn seed_history() -> Vec<SimulationResult> {
    vec![SimulationResult {
        id: "RES001".to_string(),
        scenario: "Accident on T005".to_string(),
        responses: [
            "Immediate emergency response activated",
            "12 emergency buses deployed to affected route",
            "Passenger alerts sent to 2,500 affected users",
            "Emergency services notified and coordinated",
            "Alternative routes calculated and activated",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
        execution_time_s: 2.3,
        status: SimulationStatus::Completed,
        impact_mitigation: "92% passenger flow maintained".to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::assert_all_defined;

    #[test]
    fn mappers_are_total() {
        assert_all_defined(&ScenarioKind::ALL);
        assert_all_defined(&SimulationStatus::ALL);
    }

    #[test]
    fn flood_responses_verbatim() {
        assert_eq!(
            responses(ScenarioKind::Flood),
            &[
                "Weather monitoring systems activated",
                "Alternative underground routes prioritized",
                "Power systems switched to flood-safe mode",
                "Early evacuation procedures initiated",
                "Infrastructure protection measures deployed",
            ]
        );
    }

    #[test]
    fn surge_and_unknown_fall_back_to_accident() {
        assert_eq!(responses(ScenarioKind::Surge), &ACCIDENT_RESPONSES);
        assert_eq!(responses_for_category("meteor"), &ACCIDENT_RESPONSES);
        assert_eq!(responses_for_category(""), &ACCIDENT_RESPONSES);
        assert_eq!(responses_for_category("Flood"), &FLOOD_RESPONSES);
    }

    #[test]
    fn kind_round_trips_through_text() {
        for kind in ScenarioKind::ALL {
            assert_eq!(kind.to_string().parse::<ScenarioKind>().unwrap(), kind);
        }
        assert!("tsunami".parse::<ScenarioKind>().is_err());
    }

    #[test]
    fn catalog_lookup() {
        let all = catalog();
        assert_eq!(all.len(), 4);
        assert_eq!(find("SIM004").unwrap().name, "Emergency Maintenance");
        assert_eq!(find("Cyberattack Attempt").unwrap().kind, ScenarioKind::Cyberattack);
        assert!(matches!(find("SIM999"), Err(ValidationError::UnknownScenario { .. })));
    }

    #[test]
    fn started_result_is_running() {
        let now = DateTime::<Utc>::from_timestamp_millis(1_234).unwrap();
        let r = SimulationResult::started(&catalog()[1], now);
        assert_eq!(r.id, "RES1234");
        assert_eq!(r.status, SimulationStatus::Running);
        assert!(r.responses.is_empty());
    }
}
