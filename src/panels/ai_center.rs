//! Generative AI simulation centre: model metrics, the scenario catalog and
//! the simulator state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mutator::{Accumulate, Walk};
use crate::panel::Panel;
use crate::random::RandomSource;
use crate::scenario::{catalog, Scenario, ScenarioSimulator};

pub const SCENARIOS_PROCESSED: Accumulate = Accumulate::new(3.0);
pub const AVERAGE_RESPONSE: Walk = Walk::new(0.1, 1.5, 4.0);
pub const ACCURACY: Walk = Walk::new(0.25, 94.0, 99.0);
pub const MITIGATION_SUCCESS: Walk = Walk::new(0.15, 90.0, 98.0);

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiMetrics {
    pub scenarios_processed: u64,
    /// Seconds.
    pub average_response_s: f64,
    /// Percent.
    pub accuracy: f64,
    /// Percent.
    pub mitigation_success: f64,
}

impl Default for AiMetrics {
    fn default() -> Self {
        Self {
            scenarios_processed: 1247,
            average_response_s: 2.1,
            accuracy: 96.8,
            mitigation_success: 94.2,
        }
    }
}

impl AiMetrics {
    pub fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.scenarios_processed = SCENARIOS_PROCESSED.apply_count(self.scenarios_processed, rng);
        self.average_response_s = AVERAGE_RESPONSE.apply(self.average_response_s, rng);
        self.accuracy = ACCURACY.apply(self.accuracy, rng);
        self.mitigation_success = MITIGATION_SUCCESS.apply(self.mitigation_success, rng);
    }
}

/// AI centre state. Only the metrics move on the timer; the simulator is
/// driven by [`crate::scenario::ScenarioConsole`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiCenterPanel {
    pub metrics: AiMetrics,
    pub scenarios: Vec<Scenario>,
    pub simulator: ScenarioSimulator,
}

impl Default for AiCenterPanel {
    fn default() -> Self {
        Self::new(ScenarioSimulator::default())
    }
}

impl AiCenterPanel {
    #[must_use]
    pub fn new(simulator: ScenarioSimulator) -> Self {
        Self {
            metrics: AiMetrics::default(),
            scenarios: catalog(),
            simulator,
        }
    }
}

impl Panel for AiCenterPanel {
    const NAME: &'static str = "ai-center";

    fn on_tick(&mut self, rng: &mut dyn RandomSource, _now: DateTime<Utc>) {
        self.metrics.tick(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SimRng;
    use crate::scenario::Phase;

    #[test]
    fn metrics_stay_in_domain() {
        let mut panel = AiCenterPanel::default();
        let mut rng = SimRng::from_seed_u64(21);
        for _ in 0..1000 {
            let before = panel.metrics.scenarios_processed;
            panel.on_tick(&mut rng, Utc::now());
            let m = panel.metrics;
            assert!(m.scenarios_processed >= before && m.scenarios_processed <= before + 2);
            assert!(AVERAGE_RESPONSE.bounds().contains(m.average_response_s));
            assert!(ACCURACY.bounds().contains(m.accuracy));
            assert!(MITIGATION_SUCCESS.bounds().contains(m.mitigation_success));
        }
        assert_eq!(panel.simulator.phase(), Phase::Idle);
    }

    #[test]
    fn offers_full_catalog() {
        let panel = AiCenterPanel::default();
        let ids: Vec<_> = panel.scenarios.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["SIM001", "SIM002", "SIM003", "SIM004"]);
        assert_eq!(panel.simulator.history().len(), 1);
    }
}
