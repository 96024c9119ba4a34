//! Input validation for project scheduling problems.
//!
//! [`Problem::new`] only rejects malformed shapes. This module runs the
//! whole-problem checks a GA driver wants once, before generating a
//! population. Detects:
//! - Duplicate task or element IDs
//! - Empty task IDs
//! - Skills that no element can perform
//! - Circular precedence dependencies (DAG validation)
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::Problem;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks or two elements share the same ID.
    DuplicateId,
    /// A task has an empty ID.
    EmptyTaskId,
    /// No element has positive performance for a task's skill.
    NoQualifiedResource,
    /// Precedence graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a problem instance.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. No duplicate element IDs
/// 3. No empty task IDs
/// 4. Every task skill has at least one qualified element
/// 5. No circular precedence dependencies
///
/// Non-positive durations never get this far; [`Problem::new`] rejects them.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(problem: &Problem) -> ValidationResult {
    let mut errors = Vec::new();

    let mut element_ids = HashSet::new();
    for e in problem.elements() {
        if !element_ids.insert(e.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate element ID: {}", e.id),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for (i, task) in problem.tasks().iter().enumerate() {
        if task.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyTaskId,
                format!("Task at index {i} has an empty ID"),
            ));
        } else if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }

        if !problem.elements().iter().any(|e| e.is_qualified(&task.skill)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoQualifiedResource,
                format!(
                    "Task '{}' requires skill '{}' which no element can perform",
                    task.id, task.skill
                ),
            ));
        }
    }

    if let Some(cycle_err) = detect_cycles(problem) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the precedence graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS over the successor lists. If a back-edge is
/// found (visiting a node currently in the recursion stack), a cycle exists.
fn detect_cycles(problem: &Problem) -> Option<ValidationError> {
    let n = problem.task_count();
    let mut visited = vec![false; n];
    let mut in_stack = vec![false; n];

    for node in 0..n {
        if !visited[node] && has_cycle_dfs(node, problem, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!(
                    "Circular dependency detected involving task '{}'",
                    problem.tasks()[node].id
                ),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: usize,
    problem: &Problem,
    visited: &mut [bool],
    in_stack: &mut [bool],
) -> bool {
    visited[node] = true;
    in_stack[node] = true;

    for &next in problem.successors(node) {
        if in_stack[next] {
            return true; // Back edge → cycle
        }
        if !visited[next] && has_cycle_dfs(next, problem, visited, in_stack) {
            return true;
        }
    }

    in_stack[node] = false;
    false
}
