//! Portfolio page sections that sit next to the dashboard.

pub mod skills;

pub use skills::{default_skills, CategoryFilter, Skill, SkillCategory, SkillsSection};
