//! Skills section: skill badges with a level bar and a category filter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::style::{Icon, Presentable, StyleDescriptor, Tone};

/// Highest allowed skill level.
pub const MAX_LEVEL: u8 = 100;

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Programming,
    Data,
    Ml,
    Tools,
}

impl SkillCategory {
    pub const ALL: [Self; 4] = [Self::Programming, Self::Data, Self::Ml, Self::Tools];
}

/// Filter selection. `All` shows every skill.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Programming,
    Data,
    Ml,
    Tools,
}

impl CategoryFilter {
    /// Filter buttons in display order.
    pub const ALL: [Self; 5] = [Self::All, Self::Programming, Self::Data, Self::Ml, Self::Tools];

    #[must_use]
    pub const fn category(self) -> Option<SkillCategory> {
        match self {
            Self::All => None,
            Self::Programming => Some(SkillCategory::Programming),
            Self::Data => Some(SkillCategory::Data),
            Self::Ml => Some(SkillCategory::Ml),
            Self::Tools => Some(SkillCategory::Tools),
        }
    }

    #[must_use]
    pub fn matches(self, skill: &Skill) -> bool {
        self.category().map_or(true, |c| c == skill.category)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Programming => "programming",
            Self::Data => "data",
            Self::Ml => "ml",
            Self::Tools => "tools",
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated skill as read from JSON.
#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    pub level: u8,
    pub category: SkillCategory,
}

/// A skill with a level in `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SkillRecord")]
pub struct Skill {
    name: String,
    level: u8,
    category: SkillCategory,
}

impl Skill {
    /// # Errors
    ///
    /// `ValidationError::LevelOutOfRange` for a level above 100.
    pub fn new(name: impl Into<String>, level: u8, category: SkillCategory) -> Result<Self, ValidationError> {
        let name = name.into();
        if level > MAX_LEVEL {
            return Err(ValidationError::LevelOutOfRange { name, level });
        }
        Ok(Self { name, level, category })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub const fn category(&self) -> SkillCategory {
        self.category
    }

    /// Width of the level bar, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        f64::from(self.level) / f64::from(MAX_LEVEL)
    }
}

impl TryFrom<SkillRecord> for Skill {
    type Error = ValidationError;

    fn try_from(raw: SkillRecord) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.level, raw.category)
    }
}

const CATALOG: [(&str, u8, SkillCategory); 17] = [
    ("Python", 95, SkillCategory::Programming),
    ("SQL", 90, SkillCategory::Programming),
    ("Excel", 90, SkillCategory::Data),
    ("Power BI", 85, SkillCategory::Data),
    ("Pandas", 90, SkillCategory::Data),
    ("NumPy", 85, SkillCategory::Data),
    ("Matplotlib", 85, SkillCategory::Data),
    ("Seaborn", 80, SkillCategory::Data),
    ("Plotly", 80, SkillCategory::Data),
    ("Scikit-learn", 80, SkillCategory::Ml),
    ("TensorFlow", 75, SkillCategory::Ml),
    ("Streamlit", 85, SkillCategory::Tools),
    ("Snowflake", 70, SkillCategory::Tools),
    ("MySQL", 75, SkillCategory::Tools),
    ("MongoDB", 70, SkillCategory::Tools),
    ("Google BigQuery", 65, SkillCategory::Tools),
    ("Git/GitHub", 90, SkillCategory::Tools),
];

/// The built-in skill list.
#[must_use]
pub fn default_skills() -> Vec<Skill> {
    CATALOG
        .iter()
        .map(|&(name, level, category)| Skill {
            name: name.to_string(),
            level: level.min(MAX_LEVEL),
            category,
        })
        .collect()
}

/// Skills matching `filter`, in list order.
pub fn filter(skills: &[Skill], filter: CategoryFilter) -> impl Iterator<Item = &Skill> {
    skills.iter().filter(move |s| filter.matches(s))
}

/// A category button and whether it is the selected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterButton {
    pub filter: CategoryFilter,
    pub active: bool,
}

impl Presentable for FilterButton {
    fn style(&self) -> StyleDescriptor {
        if self.active {
            StyleDescriptor::new(Tone::Primary, Icon::Dot)
        } else {
            StyleDescriptor::new(Tone::Muted, Icon::Dot)
        }
    }

    fn label(&self) -> &'static str {
        self.filter.as_str()
    }
}

/// Skills section state: the list plus the selected filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsSection {
    skills: Vec<Skill>,
    active: CategoryFilter,
}

impl Default for SkillsSection {
    fn default() -> Self {
        Self::new(default_skills())
    }
}

impl SkillsSection {
    #[must_use]
    pub fn new(skills: Vec<Skill>) -> Self {
        Self {
            skills,
            active: CategoryFilter::All,
        }
    }

    pub fn select(&mut self, filter: CategoryFilter) {
        self.active = filter;
    }

    #[must_use]
    pub const fn active(&self) -> CategoryFilter {
        self.active
    }

    pub fn visible(&self) -> impl Iterator<Item = &Skill> {
        filter(&self.skills, self.active)
    }

    /// One button per filter, the selected one marked active.
    #[must_use]
    pub fn buttons(&self) -> Vec<FilterButton> {
        CategoryFilter::ALL
            .into_iter()
            .map(|filter| FilterButton {
                filter,
                active: filter == self.active,
            })
            .collect()
    }
}
