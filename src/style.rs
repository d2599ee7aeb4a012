//! Presentation mapping.
//!
//! Categorical record fields map to a [`StyleDescriptor`] through the
//! [`Presentable`] trait. Every impl is an exhaustive `match` with no wildcard
//! arm: a new enum variant does not compile until it has a style.

use serde::{Deserialize, Serialize};

/// Semantic colour role. Hosts decide the concrete palette.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    Safe,
    Warning,
    Threat,
    Primary,
    Neural,
    Muted,
    ClimateBlue,
    ClimateGreen,
    ArAccent,
    VrAccent,
}

impl Tone {
    /// Stable token for the tone, e.g. `"climate-blue"`.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Threat => "threat",
            Self::Primary => "primary",
            Self::Neural => "neural",
            Self::Muted => "muted",
            Self::ClimateBlue => "climate-blue",
            Self::ClimateGreen => "climate-green",
            Self::ArAccent => "ar-accent",
            Self::VrAccent => "vr-accent",
        }
    }
}

/// Symbolic icon name. Hosts map these to their own icon set.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    CheckCircle,
    AlertTriangle,
    Shield,
    Lock,
    Zap,
    Radio,
    Target,
    UserX,
    Crosshair,
    Sun,
    Cloud,
    CloudRain,
    Thermometer,
    Wind,
    Eye,
    Hand,
    Layers,
    Monitor,
    Glasses,
    Headset,
    Train,
    Bus,
    Users,
    GraduationCap,
    Briefcase,
    Coffee,
    Music,
    Trophy,
    Clock,
    Brain,
    Wrench,
    Dot,
}

impl Icon {
    /// Stable kebab-case name of the icon.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CheckCircle => "check-circle",
            Self::AlertTriangle => "alert-triangle",
            Self::Shield => "shield",
            Self::Lock => "lock",
            Self::Zap => "zap",
            Self::Radio => "radio",
            Self::Target => "target",
            Self::UserX => "user-x",
            Self::Crosshair => "crosshair",
            Self::Sun => "sun",
            Self::Cloud => "cloud",
            Self::CloudRain => "cloud-rain",
            Self::Thermometer => "thermometer",
            Self::Wind => "wind",
            Self::Eye => "eye",
            Self::Hand => "hand",
            Self::Layers => "layers",
            Self::Monitor => "monitor",
            Self::Glasses => "glasses",
            Self::Headset => "headset",
            Self::Train => "train",
            Self::Bus => "bus",
            Self::Users => "users",
            Self::GraduationCap => "graduation-cap",
            Self::Briefcase => "briefcase",
            Self::Coffee => "coffee",
            Self::Music => "music",
            Self::Trophy => "trophy",
            Self::Clock => "clock",
            Self::Brain => "brain",
            Self::Wrench => "wrench",
            Self::Dot => "dot",
        }
    }
}

/// Display style for one categorical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub tone: Tone,
    pub icon: Icon,
    /// Draw attention (pulse/glow) for the most severe states.
    pub emphasis: bool,
}

impl StyleDescriptor {
    #[must_use]
    pub const fn new(tone: Tone, icon: Icon) -> Self {
        Self {
            tone,
            icon,
            emphasis: false,
        }
    }

    #[must_use]
    pub const fn emphasized(tone: Tone, icon: Icon) -> Self {
        Self {
            tone,
            icon,
            emphasis: true,
        }
    }

    /// Space-separated style class list, e.g. `"tone-threat icon-shield emphasis"`.
    #[must_use]
    pub fn class_list(&self) -> String {
        let mut out = format!("tone-{} icon-{}", self.tone.token(), self.icon.name());
        if self.emphasis {
            out.push_str(" emphasis");
        }
        out
    }
}

/// Total mapping from a categorical value to its style.
pub trait Presentable {
    fn style(&self) -> StyleDescriptor;

    /// Human-readable label, e.g. `"ON TIME"`.
    fn label(&self) -> &'static str;
}

/// Shared four-level severity scale.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

impl Presentable for Severity {
    fn style(&self) -> StyleDescriptor {
        match self {
            Self::Low => StyleDescriptor::new(Tone::Safe, Icon::Dot),
            Self::Medium => StyleDescriptor::new(Tone::Warning, Icon::Dot),
            Self::High => StyleDescriptor::new(Tone::Threat, Icon::AlertTriangle),
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

#[cfg(test)]
pub(crate) fn assert_all_defined<T: Presentable>(values: &[T]) {
    for v in values {
        let style = v.style();
        assert!(!style.tone.token().is_empty());
        assert!(!style.icon.name().is_empty());
        assert!(!style.class_list().is_empty());
        assert!(!v.label().is_empty());
    }
}
