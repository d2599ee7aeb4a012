//! Dashboard header: live clock, overall status and headline figures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::panel::Panel;
use crate::random::RandomSource;
use crate::style::{Icon, Presentable, StyleDescriptor, Tone};

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemStatus {
    Optimal,
    Warning,
    Critical,
}

impl SystemStatus {
    pub const ALL: [Self; 3] = [Self::Optimal, Self::Warning, Self::Critical];
}

impl Presentable for SystemStatus {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Optimal => StyleDescriptor::emphasized(Tone::Safe, Icon::Dot),
            Self::Warning => StyleDescriptor::emphasized(Tone::Warning, Icon::Dot),
            Self::Critical => StyleDescriptor::emphasized(Tone::Threat, Icon::Dot),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Optimal => "OPTIMAL",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderPanel {
    pub current_time: DateTime<Utc>,
    pub system_status: SystemStatus,
    pub active_trains: u32,
    pub passengers: u32,
    /// Percent.
    pub energy_efficiency: u32,
}

impl HeaderPanel {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            current_time: now,
            system_status: SystemStatus::Optimal,
            active_trains: 42,
            passengers: 8_200,
            energy_efficiency: 94,
        }
    }

    /// Clock as shown in the header, `HH:MM:SS`.
    #[must_use]
    pub fn clock(&self) -> String {
        self.current_time.format("%H:%M:%S").to_string()
    }

    /// Passenger figure in thousands, e.g. `"8.2k"`.
    #[must_use]
    pub fn passengers_display(&self) -> String {
        format!("{:.1}k", f64::from(self.passengers) / 1000.0)
    }
}

impl Panel for HeaderPanel {
    const NAME: &'static str = "header";

    fn on_tick(&mut self, _rng: &mut dyn RandomSource, now: DateTime<Utc>) {
        self.current_time = now;
    }
}
