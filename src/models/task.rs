//! Task model.
//!
//! A task is a single unit of project work: a fixed amount of effort
//! (`duration`) that must be performed by elements holding the task's
//! skill, after all of its precedence tasks have completed.
//!
//! # Reference
//! Kolisch & Hartmann (1999), "Heuristic Algorithms for the Resource-Constrained
//! Project Scheduling Problem"

use serde::{Deserialize, Serialize};

/// A project task to be scheduled.
///
/// # Time Representation
/// `duration` is the nominal effort at a combined work rate of 1.0.
/// The simulator divides it by the summed performance of the assigned
/// elements, so two elements at 1.0 finish a task in half the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Nominal effort (time units at work rate 1.0).
    pub duration: i64,
    /// Skill an element needs to work on this task.
    pub skill: String,
    /// Indices of tasks that must complete before this one starts.
    #[serde(default)]
    pub precedences: Vec<usize>,
}

impl Task {
    /// Creates a task with no precedences.
    pub fn new(id: impl Into<String>, duration: i64, skill: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            duration,
            skill: skill.into(),
            precedences: Vec::new(),
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a precedence (by task index).
    pub fn with_precedence(mut self, task: usize) -> Self {
        self.precedences.push(task);
        self
    }

    /// Adds several precedences (by task index).
    pub fn with_precedences(mut self, tasks: impl IntoIterator<Item = usize>) -> Self {
        self.precedences.extend(tasks);
        self
    }

    /// Whether this task waits on any other task.
    pub fn has_precedences(&self) -> bool {
        !self.precedences.is_empty()
    }
}
