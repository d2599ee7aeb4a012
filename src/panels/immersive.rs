//! AR/VR operations panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mutator::{Perturb, RecordStore, Walk};
use crate::panel::Panel;
use crate::random::RandomSource;
use crate::style::{Icon, Presentable, StyleDescriptor, Tone};

pub const ACTIVE_USERS: Walk = Walk::new(1.5, 15.0, 35.0);
pub const SYSTEM_LOAD: Walk = Walk::new(2.5, 50.0, 90.0);
pub const RENDER_QUALITY: Walk = Walk::new(1.0, 85.0, 100.0);

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionKind {
    Ar,
    Vr,
}

impl SessionKind {
    pub const ALL: [Self; 2] = [Self::Ar, Self::Vr];
}

impl Presentable for SessionKind {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Ar => StyleDescriptor::new(Tone::ArAccent, Icon::Glasses),
            Self::Vr => StyleDescriptor::new(Tone::VrAccent, Icon::Headset),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Ar => "AR",
            Self::Vr => "VR",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Active,
    Standby,
    Maintenance,
}

impl SessionStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Standby, Self::Maintenance];
}

impl Presentable for SessionStatus {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Active => StyleDescriptor::new(Tone::Safe, Icon::Dot),
            Self::Standby => StyleDescriptor::new(Tone::Warning, Icon::Dot),
            Self::Maintenance => StyleDescriptor::new(Tone::Threat, Icon::Wrench),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Standby => "STANDBY",
            Self::Maintenance => "MAINTENANCE",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureKind {
    Visualization,
    Interaction,
    Collaboration,
    Training,
}

impl FeatureKind {
    pub const ALL: [Self; 4] = [Self::Visualization, Self::Interaction, Self::Collaboration, Self::Training];
}

impl Presentable for FeatureKind {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Visualization => StyleDescriptor::new(Tone::ArAccent, Icon::Eye),
            Self::Interaction => StyleDescriptor::new(Tone::Primary, Icon::Hand),
            Self::Collaboration => StyleDescriptor::new(Tone::VrAccent, Icon::Layers),
            Self::Training => StyleDescriptor::new(Tone::Neural, Icon::Monitor),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Visualization => "Visualization",
            Self::Interaction => "Interaction",
            Self::Collaboration => "Collaboration",
            Self::Training => "Training",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureStatus {
    Online,
    Offline,
    Updating,
}

impl FeatureStatus {
    pub const ALL: [Self; 3] = [Self::Online, Self::Offline, Self::Updating];
}

impl Presentable for FeatureStatus {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Online => StyleDescriptor::new(Tone::Safe, Icon::CheckCircle),
            Self::Offline => StyleDescriptor::new(Tone::Threat, Icon::AlertTriangle),
            Self::Updating => StyleDescriptor::new(Tone::Warning, Icon::Clock),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
            Self::Updating => "UPDATING",
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmersiveSession {
    pub id: String,
    pub user: String,
    pub kind: SessionKind,
    pub location: String,
    /// Minutes; grows by one per tick while active.
    pub duration: u32,
    pub activity: String,
    pub status: SessionStatus,
}

impl Perturb for ImmersiveSession {
    fn perturbed(&self, _rng: &mut dyn RandomSource) -> Self {
        let duration = match self.status {
            SessionStatus::Active => self.duration.saturating_add(1),
            SessionStatus::Standby | SessionStatus::Maintenance => self.duration,
        };
        Self {
            duration,
            ..self.clone()
        }
    }
}

/// A platform capability. Static.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmersiveFeature {
    pub name: String,
    pub kind: FeatureKind,
    pub status: FeatureStatus,
    pub users: u32,
    pub description: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImmersiveMetrics {
    pub active_users: u32,
    pub average_session_minutes: u32,
    /// Percent.
    pub system_load: u32,
    /// Percent.
    pub render_quality: u32,
}

impl Default for ImmersiveMetrics {
    fn default() -> Self {
        Self {
            active_users: 23,
            average_session_minutes: 42,
            system_load: 68,
            render_quality: 94,
        }
    }
}

impl ImmersiveMetrics {
    pub fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.active_users = ACTIVE_USERS.apply_count(self.active_users, rng);
        self.system_load = SYSTEM_LOAD.apply_count(self.system_load, rng);
        self.render_quality = RENDER_QUALITY.apply_count(self.render_quality, rng);
    }
}

#[must_use]
pub fn seed_sessions() -> Vec<ImmersiveSession> {
    let session = |id: &str, user: &str, kind, location: &str, duration, activity: &str| ImmersiveSession {
        id: id.to_string(),
        user: user.to_string(),
        kind,
        location: location.to_string(),
        duration,
        activity: activity.to_string(),
        status: SessionStatus::Active,
    };
    vec![
        session("AR001", "Operations Manager", SessionKind::Ar, "Control Center", 45, "Live train monitoring overlay"),
        session("VR002", "Maintenance Team", SessionKind::Vr, "Remote Office", 23, "Virtual inspection simulation"),
        session("AR003", "Safety Inspector", SessionKind::Ar, "Station Platform", 67, "Real-time safety assessment"),
    ]
}

#[must_use]
pub fn seed_features() -> Vec<ImmersiveFeature> {
    let feature = |name: &str, kind, status, users, description: &str| ImmersiveFeature {
        name: name.to_string(),
        kind,
        status,
        users,
        description: description.to_string(),
    };
    vec![
        feature(
            "3D Train Visualization",
            FeatureKind::Visualization,
            FeatureStatus::Online,
            8,
            "Real-time 3D models of all active trains with sensor data overlay",
        ),
        feature(
            "Holographic Controls",
            FeatureKind::Interaction,
            FeatureStatus::Online,
            3,
            "Gesture-based control interface for system management",
        ),
        feature(
            "Collaborative Workspaces",
            FeatureKind::Collaboration,
            FeatureStatus::Online,
            12,
            "Shared virtual environments for team coordination",
        ),
        feature(
            "Emergency Response Training",
            FeatureKind::Training,
            FeatureStatus::Updating,
            0,
            "VR-based crisis simulation and response training modules",
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmersivePanel {
    pub sessions: RecordStore<ImmersiveSession>,
    pub features: Vec<ImmersiveFeature>,
    pub metrics: ImmersiveMetrics,
}

impl Default for ImmersivePanel {
    fn default() -> Self {
        Self {
            sessions: RecordStore::new(seed_sessions()),
            features: seed_features(),
            metrics: ImmersiveMetrics::default(),
        }
    }
}

impl ImmersivePanel {
    #[must_use]
    pub fn sessions_of(&self, kind: SessionKind) -> usize {
        self.sessions.iter().filter(|s| s.kind == kind).count()
    }
}

impl Panel for ImmersivePanel {
    const NAME: &'static str = "immersive";

    fn on_tick(&mut self, rng: &mut dyn RandomSource, _now: DateTime<Utc>) {
        self.sessions.tick(rng);
        self.metrics.tick(rng);
    }
}
