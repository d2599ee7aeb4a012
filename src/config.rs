//! Dashboard configuration.
//!
//! Every field has a default matching the stock dashboard, so an empty JSON
//! object is a valid config. Files are read with [`TwinConfig::load`] and
//! checked with [`TwinConfig::validate`] before anything is mounted.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{TwinError, TwinResult, ValidationError};
use crate::mutator::FeedPolicy;
use crate::panels::security::{DEFAULT_ALERT_CAPACITY, DEFAULT_ALERT_PROBABILITY};
use crate::scenario::simulator::DEFAULT_HISTORY_CAPACITY;

/// Per-panel refresh intervals, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntervalsConfig {
    pub header: u64,
    pub trains: u64,
    pub security: u64,
    pub passengers: u64,
    pub transport: u64,
    pub climate: u64,
    pub immersive: u64,
    pub ai_metrics: u64,
}

impl Default for IntervalsConfig {
    fn default() -> Self {
        Self {
            header: 1000,
            trains: 2000,
            security: 3000,
            passengers: 3000,
            transport: 4000,
            climate: 5000,
            immersive: 5000,
            ai_metrics: 5000,
        }
    }
}

impl IntervalsConfig {
    fn named(&self) -> [(&'static str, u64); 8] {
        [
            ("intervals.header", self.header),
            ("intervals.trains", self.trains),
            ("intervals.security", self.security),
            ("intervals.passengers", self.passengers),
            ("intervals.transport", self.transport),
            ("intervals.climate", self.climate),
            ("intervals.immersive", self.immersive),
            ("intervals.ai_metrics", self.ai_metrics),
        ]
    }

    /// Converts a millisecond field to a `Duration`.
    #[must_use]
    pub const fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }
}

/// Security alert feed settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertsConfig {
    /// Chance of a new alert on each security tick.
    pub spawn_probability: f64,
    /// Alerts kept, newest first.
    pub capacity: usize,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            spawn_probability: DEFAULT_ALERT_PROBABILITY,
            capacity: DEFAULT_ALERT_CAPACITY,
        }
    }
}

impl AlertsConfig {
    pub fn feed_policy(&self) -> Result<FeedPolicy, ValidationError> {
        FeedPolicy::try_new(self.spawn_probability, self.capacity).map_err(|e| match e {
            ValidationError::ZeroCapacity { .. } => ValidationError::ZeroCapacity {
                field: "alerts.capacity".to_string(),
            },
            other => other,
        })
    }
}

/// Scenario simulator timing and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Time spent in `running` before responses are revealed.
    pub running_ms: u64,
    /// Time spent in `analyzing` before the run completes.
    pub analyzing_ms: u64,
    pub history_capacity: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            running_ms: 2000,
            analyzing_ms: 3000,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl SimulatorConfig {
    #[must_use]
    pub const fn running(&self) -> Duration {
        Duration::from_millis(self.running_ms)
    }

    #[must_use]
    pub const fn analyzing(&self) -> Duration {
        Duration::from_millis(self.analyzing_ms)
    }

    /// Delay from launch to completion.
    #[must_use]
    pub const fn total(&self) -> Duration {
        Duration::from_millis(self.running_ms.saturating_add(self.analyzing_ms))
    }
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TwinConfig {
    /// Seed for every panel's random stream. `None` draws one from entropy.
    pub seed: Option<u64>,
    pub intervals: IntervalsConfig,
    pub alerts: AlertsConfig,
    pub simulator: SimulatorConfig,
}

impl TwinConfig {
    /// Parses a JSON config.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidConfig` for malformed JSON or unknown
    /// fields. The result is not validated; call [`Self::validate`].
    pub fn from_json_str(json: &str) -> TwinResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            ValidationError::InvalidConfig {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> TwinResult<Self> {
        let path = path.as_ref();
        let config_error = |message: String| TwinError::Config {
            path: path.to_path_buf(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: Self = serde_json::from_str(&text).map_err(|e| config_error(e.to_string()))?;
        config.validate().map_err(|e| config_error(e.to_string()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Checks intervals, capacities and the alert probability.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, ms) in self.intervals.named() {
            if ms == 0 {
                return Err(ValidationError::ZeroInterval {
                    name: name.to_string(),
                });
            }
        }
        self.alerts.feed_policy()?;
        if self.simulator.history_capacity == 0 {
            return Err(ValidationError::ZeroCapacity {
                field: "simulator.history_capacity".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let cfg = TwinConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, TwinConfig::default());
        cfg.validate().unwrap();
        assert_eq!(cfg.simulator.total(), Duration::from_secs(5));
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = TwinConfig::from_json_str(r#"{"seed": 7, "intervals": {"trains": 500}}"#).unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.intervals.trains, 500);
        assert_eq!(cfg.intervals.header, 1000);
        assert_eq!(cfg.alerts.capacity, 10);
    }

    #[test]
    fn unknown_field_rejected() {
        let err = TwinConfig::from_json_str(r#"{"intervalz": {}}"#).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn zero_interval_names_the_field() {
        let mut cfg = TwinConfig::default();
        cfg.intervals.climate = 0;
        match cfg.validate() {
            Err(ValidationError::ZeroInterval { name }) => assert_eq!(name, "intervals.climate"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn bad_alert_settings_rejected() {
        let mut cfg = TwinConfig::default();
        cfg.alerts.spawn_probability = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::ProbabilityOutOfRange { .. })
        ));
        cfg.alerts.spawn_probability = 0.5;
        cfg.alerts.capacity = 0;
        match cfg.validate() {
            Err(ValidationError::ZeroCapacity { field }) => assert_eq!(field, "alerts.capacity"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn zero_history_rejected() {
        let mut cfg = TwinConfig::default();
        cfg.simulator.history_capacity = 0;
        assert!(cfg.validate().is_err());
    }
}
