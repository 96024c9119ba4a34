//! Element (resource) model.
//!
//! Elements are the workers that perform tasks. Each element carries a
//! performance factor per skill; the factor is a work-rate multiplier
//! (1.0 = nominal, 2.0 = twice as fast) and a value `<= 0` means the
//! element cannot perform that skill at all.

use serde::{Deserialize, Serialize};

/// A worker that can be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique element identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Skills with performance factors.
    #[serde(default)]
    pub skills: Vec<SkillPerformance>,
}

/// A skill with its work-rate multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillPerformance {
    /// Skill name (e.g., "frontend", "testing").
    pub skill: String,
    /// Work-rate multiplier. Not clamped; `<= 0` means unqualified.
    pub performance: f64,
}

impl Element {
    /// Creates an element with no skills.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            skills: Vec::new(),
        }
    }

    /// Sets the element name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a skill. A later entry for the same skill replaces the earlier one.
    pub fn with_skill(mut self, skill: impl Into<String>, performance: f64) -> Self {
        let skill = skill.into();
        match self.skills.iter_mut().find(|s| s.skill == skill) {
            Some(existing) => existing.performance = performance,
            None => self.skills.push(SkillPerformance { skill, performance }),
        }
        self
    }

    /// Returns the performance factor for a skill (0.0 if not found).
    pub fn skill_performance(&self, skill: &str) -> f64 {
        self.skills
            .iter()
            .find(|s| s.skill == skill)
            .map(|s| s.performance)
            .unwrap_or(0.0)
    }

    /// Whether this element can perform the skill.
    pub fn is_qualified(&self, skill: &str) -> bool {
        self.skill_performance(skill) > 0.0
    }
}

impl SkillPerformance {
    /// Creates a skill entry.
    pub fn new(skill: impl Into<String>, performance: f64) -> Self {
        Self {
            skill: skill.into(),
            performance,
        }
    }
}
