//! Schedule (solution) model.
//!
//! A schedule records, for every task, the elements that worked on it and
//! the interval it occupied. It is produced by the simulator from a decoded
//! chromosome and can audit itself against the problem.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Problem;

/// A complete schedule for one problem instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Decoded task order (priority list the simulator worked from).
    pub task_order: Vec<usize>,
    /// One assignment per task, indexed by task index.
    pub assignments: Vec<Assignment>,
}

/// A task-elements-time assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Task index.
    pub task: usize,
    /// Element indices that worked on the task.
    pub elements: Vec<usize>,
    /// Start time.
    pub start: i64,
    /// Completion time.
    pub end: i64,
    /// Whether the elements came from the fallback rule rather than the
    /// chromosome's candidate list.
    pub fallback: bool,
}

/// A constraint violation found by [`Schedule::find_violations`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Task index the violation is reported against.
    pub task: usize,
    /// Human-readable description.
    pub message: String,
}

/// Classification of constraint violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Task started before one of its precedences finished.
    PrecedenceViolation,
    /// An element works on two overlapping tasks.
    ResourceOverlap,
    /// An assigned element lacks the task's skill.
    SkillMismatch,
    /// A task has no assignment or no elements.
    Unassigned,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(task: usize, elements: Vec<usize>, start: i64, end: i64) -> Self {
        Self {
            task,
            elements,
            start,
            end,
            fallback: false,
        }
    }

    /// Marks the assignment as produced by the fallback rule.
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Duration (end - start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Whether the interval overlaps another (half-open intervals).
    #[inline]
    pub fn overlaps(&self, other: &Assignment) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl Violation {
    fn new(violation_type: ViolationType, task: usize, message: impl Into<String>) -> Self {
        Self {
            violation_type,
            task,
            message: message.into(),
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makespan: latest completion time across all tasks.
    pub fn makespan(&self) -> i64 {
        self.assignments.iter().map(|a| a.end).max().unwrap_or(0)
    }

    /// Assignment for a task.
    pub fn assignment(&self, task: usize) -> Option<&Assignment> {
        self.assignments.get(task)
    }

    /// Start time of a task.
    pub fn start_time(&self, task: usize) -> Option<i64> {
        self.assignment(task).map(|a| a.start)
    }

    /// Completion time of a task.
    pub fn completion_time(&self, task: usize) -> Option<i64> {
        self.assignment(task).map(|a| a.end)
    }

    /// Duration of a task.
    pub fn task_duration(&self, task: usize) -> Option<i64> {
        self.assignment(task).map(Assignment::duration)
    }

    /// Task indices sorted by completion time (ties by start, then index).
    pub fn completion_order(&self) -> Vec<usize> {
        let mut order: Vec<&Assignment> = self.assignments.iter().collect();
        order.sort_by_key(|a| (a.end, a.start, a.task));
        order.into_iter().map(|a| a.task).collect()
    }

    /// Assignments an element worked on, in start-time order.
    pub fn assignments_for_element(&self, element: usize) -> Vec<&Assignment> {
        let mut found: Vec<&Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.elements.contains(&element))
            .collect();
        found.sort_by_key(|a| (a.start, a.task));
        found
    }

    /// Element utilization: busy time / makespan.
    ///
    /// Returns `None` if the makespan is zero.
    pub fn element_utilization(&self, element: usize) -> Option<f64> {
        let horizon = self.makespan();
        if horizon <= 0 {
            return None;
        }
        let busy: i64 = self
            .assignments_for_element(element)
            .iter()
            .map(|a| a.duration())
            .sum();
        Some(busy as f64 / horizon as f64)
    }

    /// Utilization for every element that has at least one assignment.
    pub fn all_utilizations(&self) -> HashMap<usize, f64> {
        let horizon = self.makespan();
        if horizon <= 0 {
            return HashMap::new();
        }

        let mut busy: HashMap<usize, i64> = HashMap::new();
        for a in &self.assignments {
            for &e in &a.elements {
                *busy.entry(e).or_insert(0) += a.duration();
            }
        }

        busy.into_iter()
            .map(|(e, t)| (e, t as f64 / horizon as f64))
            .collect()
    }

    /// Audits the schedule against the problem's constraints.
    ///
    /// Checks precedence, element overlap, and element skill. An empty
    /// result means the schedule is feasible.
    pub fn find_violations(&self, problem: &Problem) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (index, task) in problem.tasks().iter().enumerate() {
            let Some(a) = self.assignment(index) else {
                violations.push(Violation::new(
                    ViolationType::Unassigned,
                    index,
                    format!("Task '{}' has no assignment", task.id),
                ));
                continue;
            };
            if a.elements.is_empty() {
                violations.push(Violation::new(
                    ViolationType::Unassigned,
                    index,
                    format!("Task '{}' has no elements", task.id),
                ));
            }

            for &p in &task.precedences {
                if let Some(pred_end) = self.completion_time(p) {
                    if a.start < pred_end {
                        violations.push(Violation::new(
                            ViolationType::PrecedenceViolation,
                            index,
                            format!(
                                "Task '{}' starts at {} before precedence {} ends at {}",
                                task.id, a.start, p, pred_end
                            ),
                        ));
                    }
                }
            }

            for &e in &a.elements {
                let qualified = problem
                    .element(e)
                    .is_some_and(|el| el.is_qualified(&task.skill));
                if !qualified {
                    violations.push(Violation::new(
                        ViolationType::SkillMismatch,
                        index,
                        format!("Element {} cannot perform skill '{}'", e, task.skill),
                    ));
                }
            }
        }

        for element in 0..problem.element_count() {
            let worked = self.assignments_for_element(element);
            for pair in worked.windows(2) {
                // Zero-length tasks never block an element.
                if pair[0].duration() > 0 && pair[1].duration() > 0 && pair[0].overlaps(pair[1]) {
                    violations.push(Violation::new(
                        ViolationType::ResourceOverlap,
                        pair[1].task,
                        format!(
                            "Element {} works on tasks {} and {} at the same time",
                            element, pair[0].task, pair[1].task
                        ),
                    ));
                }
            }
        }

        violations
    }

    /// Whether [`find_violations`](Self::find_violations) reports nothing.
    pub fn is_feasible(&self, problem: &Problem) -> bool {
        self.find_violations(problem).is_empty()
    }
}
