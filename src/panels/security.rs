//! Security operations centre panel: metrics, threat intel and a live alert feed.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::mutator::{Accumulate, FeedPolicy, Walk};
use crate::panel::Panel;
use crate::random::RandomSource;
use crate::style::{Icon, Presentable, Severity, StyleDescriptor, Tone};

pub const THREATS_BLOCKED: Accumulate = Accumulate::new(3.0);
pub const SYSTEM_INTEGRITY: Walk = Walk::new(1.0, 95.0, 100.0);
pub const NETWORK_SECURITY: Walk = Walk::new(1.5, 90.0, 100.0);

/// Default chance of a new alert per tick.
pub const DEFAULT_ALERT_PROBABILITY: f64 = 0.1;
/// Default number of alerts kept.
pub const DEFAULT_ALERT_CAPACITY: usize = 10;
pub const DEFAULT_ALERT_FEED: FeedPolicy = FeedPolicy::new(DEFAULT_ALERT_PROBABILITY, DEFAULT_ALERT_CAPACITY);

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertCategory {
    Anomaly,
    Intrusion,
    Malware,
    Normal,
    Spoofing,
    GpsJamming,
    UnauthorizedLogin,
}

impl AlertCategory {
    pub const ALL: [Self; 7] = [
        Self::Anomaly,
        Self::Intrusion,
        Self::Malware,
        Self::Normal,
        Self::Spoofing,
        Self::GpsJamming,
        Self::UnauthorizedLogin,
    ];
}

impl Presentable for AlertCategory {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Anomaly => StyleDescriptor::new(Tone::Warning, Icon::AlertTriangle),
            Self::Intrusion => StyleDescriptor::new(Tone::Threat, Icon::Shield),
            Self::Malware => StyleDescriptor::new(Tone::Threat, Icon::Zap),
            Self::Normal => StyleDescriptor::new(Tone::Safe, Icon::Lock),
            Self::Spoofing => StyleDescriptor::new(Tone::Warning, Icon::Target),
            Self::GpsJamming => StyleDescriptor::new(Tone::Threat, Icon::Radio),
            Self::UnauthorizedLogin => StyleDescriptor::new(Tone::Threat, Icon::UserX),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Anomaly => "ANOMALY",
            Self::Intrusion => "INTRUSION",
            Self::Malware => "MALWARE",
            Self::Normal => "NORMAL",
            Self::Spoofing => "SPOOFING",
            Self::GpsJamming => "GPS JAMMING",
            Self::UnauthorizedLogin => "UNAUTHORIZED LOGIN",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertStatus {
    Active,
    Investigating,
    Resolved,
}

impl AlertStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Investigating, Self::Resolved];
}

impl Presentable for AlertStatus {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Active => StyleDescriptor::new(Tone::Threat, Icon::Dot),
            Self::Investigating => StyleDescriptor::new(Tone::Warning, Icon::Dot),
            Self::Resolved => StyleDescriptor::new(Tone::Safe, Icon::CheckCircle),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Investigating => "INVESTIGATING",
            Self::Resolved => "RESOLVED",
        }
    }
}

/// Overall security posture shown in the panel header.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityPosture {
    Secure,
    Alert,
    Critical,
}

impl SecurityPosture {
    pub const ALL: [Self; 3] = [Self::Secure, Self::Alert, Self::Critical];
}

impl Presentable for SecurityPosture {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Secure => StyleDescriptor::new(Tone::Safe, Icon::Shield),
            Self::Alert => StyleDescriptor::new(Tone::Warning, Icon::Shield),
            Self::Critical => StyleDescriptor::emphasized(Tone::Threat, Icon::Shield),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Secure => "SECURE",
            Self::Alert => "ALERT",
            Self::Critical => "CRITICAL",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub id: String,
    pub category: AlertCategory,
    pub severity: Severity,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_action: Option<String>,
}

impl SecurityAlert {
    /// Synthesizes a low-grade behavioural alert stamped at `now`.
    ///
    /// The id is `SEC` followed by the last three digits of the millisecond
    /// timestamp.
    pub fn synthesize(now: DateTime<Utc>, rng: &mut dyn RandomSource) -> Self {
        let millis = now.timestamp_millis().rem_euclid(1000);
        let category = if rng.next_unit() > 0.8 {
            AlertCategory::Anomaly
        } else {
            AlertCategory::Normal
        };
        let severity = if rng.next_unit() > 0.7 {
            Severity::Medium
        } else {
            Severity::Low
        };
        Self {
            id: format!("SEC{millis:03}"),
            category,
            severity,
            description: "AI behavioral analysis detected minor system deviation".to_string(),
            timestamp: now,
            source: "Neural Security Monitor".to_string(),
            status: AlertStatus::Active,
            attack_type: None,
            response_action: None,
        }
    }
}

/// Aggregated intelligence about one attack type. Static.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityThreat {
    pub attack_type: String,
    pub count: u32,
    pub last_seen: String,
    pub risk_level: Severity,
    pub response_action: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecurityMetrics {
    /// Monotonic.
    pub threats_blocked: u64,
    pub system_integrity: f64,
    pub encryption: f64,
    pub network_security: f64,
}

impl Default for SecurityMetrics {
    fn default() -> Self {
        Self {
            threats_blocked: 1247,
            system_integrity: 98.5,
            encryption: 100.0,
            network_security: 96.2,
        }
    }
}

impl SecurityMetrics {
    pub fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.threats_blocked = THREATS_BLOCKED.apply_count(self.threats_blocked, rng);
        self.system_integrity = SYSTEM_INTEGRITY.apply(self.system_integrity, rng);
        self.network_security = NETWORK_SECURITY.apply(self.network_security, rng);
    }
}

fn seeded_alert(
    id: &str,
    category: AlertCategory,
    severity: Severity,
    description: &str,
    age_minutes: i64,
    source: &str,
    status: AlertStatus,
    attack_type: &str,
    response_action: &str,
    now: DateTime<Utc>,
) -> SecurityAlert {
    SecurityAlert {
        id: id.to_string(),
        category,
        severity,
        description: description.to_string(),
        timestamp: now - Duration::minutes(age_minutes),
        source: source.to_string(),
        status,
        attack_type: Some(attack_type.to_string()),
        response_action: Some(response_action.to_string()),
    }
}

/// Alerts present when the panel mounts, timestamped relative to `now`.
#[must_use]
pub fn seed_alerts(now: DateTime<Utc>) -> Vec<SecurityAlert> {
    vec![
        seeded_alert(
            "SEC001",
            AlertCategory::GpsJamming,
            Severity::High,
            "GPS signal interference detected on Train T012",
            5,
            "Navigation Security Monitor",
            AlertStatus::Investigating,
            "GPS Jamming",
            "Backup navigation activated",
            now,
        ),
        seeded_alert(
            "SEC002",
            AlertCategory::Spoofing,
            Severity::Medium,
            "Sensor data spoofing attempt blocked",
            8,
            "Sensor Integrity Shield",
            AlertStatus::Resolved,
            "Sensor Spoofing",
            "Source isolated & blocked",
            now,
        ),
        seeded_alert(
            "SEC003",
            AlertCategory::UnauthorizedLogin,
            Severity::Critical,
            "Multiple failed admin login attempts detected",
            2,
            "Access Control Monitor",
            AlertStatus::Active,
            "Brute Force Attack",
            "Account locked, IP banned",
            now,
        ),
    ]
}

#[must_use]
pub fn seed_threats() -> Vec<SecurityThreat> {
    let threat = |attack_type: &str, count, last_seen: &str, risk_level, response_action: &str| SecurityThreat {
        attack_type: attack_type.to_string(),
        count,
        last_seen: last_seen.to_string(),
        risk_level,
        response_action: response_action.to_string(),
    };
    vec![
        threat("GPS Jamming", 23, "5 min ago", Severity::High, "Switched to backup navigation"),
        threat("Sensor Spoofing", 45, "8 min ago", Severity::Medium, "Data source isolated"),
        threat("Unauthorized Access", 12, "2 min ago", Severity::Critical, "Account locked & monitored"),
        threat("Network Intrusion", 8, "15 min ago", Severity::Medium, "Traffic filtered & logged"),
    ]
}

/// Security panel state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityPanel {
    pub posture: SecurityPosture,
    pub metrics: SecurityMetrics,
    pub threats: Vec<SecurityThreat>,
    /// Newest first, never longer than the feed capacity.
    pub alerts: VecDeque<SecurityAlert>,
    feed: FeedPolicy,
}

impl SecurityPanel {
    /// Seeds the panel as of `now` with the given feed policy.
    #[must_use]
    pub fn new(now: DateTime<Utc>, feed: FeedPolicy) -> Self {
        let mut alerts: VecDeque<SecurityAlert> = seed_alerts(now).into();
        alerts.truncate(feed.capacity());
        Self {
            posture: SecurityPosture::Secure,
            metrics: SecurityMetrics::default(),
            threats: seed_threats(),
            alerts,
            feed,
        }
    }

    /// Seeds the panel with the default feed policy.
    #[must_use]
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        Self::new(now, DEFAULT_ALERT_FEED)
    }

    #[must_use]
    pub const fn feed(&self) -> FeedPolicy {
        self.feed
    }

    /// Number of alerts that are still active.
    #[must_use]
    pub fn active_alerts(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Active)
            .count()
    }
}

impl Panel for SecurityPanel {
    const NAME: &'static str = "security";

    fn on_tick(&mut self, rng: &mut dyn RandomSource, now: DateTime<Utc>) {
        self.metrics.tick(rng);
        if self
            .feed
            .offer(&mut self.alerts, rng, |rng| SecurityAlert::synthesize(now, rng))
        {
            tracing::debug!(alerts = self.alerts.len(), "security alert raised");
        }
    }
}
