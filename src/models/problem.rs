//! Problem instance.
//!
//! An immutable, index-addressed collection of tasks and elements.
//! Task and element indices are the canonical identifiers used by the
//! chromosome encoding, the decoder, and the simulator.

use serde::{Deserialize, Serialize};

use super::{Element, Task};
use crate::error::{RcpspError, Result};

/// A resource-constrained project scheduling instance.
///
/// Built once by the caller and shared read-only (usually as
/// `Arc<Problem>`) by every chromosome of a GA run.
///
/// # Example
/// ```
/// use u_rcpsp::models::{Element, Problem, Task};
///
/// let problem = Problem::new(
///     vec![
///         Task::new("A", 10, "dev"),
///         Task::new("B", 20, "dev").with_precedence(0),
///     ],
///     vec![Element::new("E1").with_skill("dev", 1.0)],
/// )
/// .unwrap();
/// assert_eq!(problem.successors(0), &[1]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProblemData")]
pub struct Problem {
    tasks: Vec<Task>,
    elements: Vec<Element>,
    #[serde(skip)]
    successors: Vec<Vec<usize>>,
}

/// Unchecked wire form of [`Problem`].
#[derive(Deserialize)]
struct ProblemData {
    tasks: Vec<Task>,
    elements: Vec<Element>,
}

impl TryFrom<ProblemData> for Problem {
    type Error = RcpspError;

    fn try_from(data: ProblemData) -> Result<Self> {
        Problem::new(data.tasks, data.elements)
    }
}

impl Problem {
    /// Creates a problem, checking its shape.
    ///
    /// Duplicate precedence indices are collapsed. Cycles and unqualified
    /// skills are not rejected here; see [`crate::validation`].
    ///
    /// # Errors
    /// - `InvalidProblemSize` if there are no tasks or no elements.
    /// - `InvalidDuration` if a task's duration is not positive.
    /// - `InvalidTaskReference` if a precedence is out of range or self-referencing.
    pub fn new(mut tasks: Vec<Task>, elements: Vec<Element>) -> Result<Self> {
        if tasks.is_empty() || elements.is_empty() {
            return Err(RcpspError::InvalidProblemSize {
                tasks: tasks.len(),
                elements: elements.len(),
            });
        }

        let n = tasks.len();
        let mut successors = vec![Vec::new(); n];
        for (i, task) in tasks.iter_mut().enumerate() {
            if task.duration <= 0 {
                return Err(RcpspError::InvalidDuration {
                    task: i,
                    duration: task.duration,
                });
            }
            task.precedences.sort_unstable();
            task.precedences.dedup();
            for &p in &task.precedences {
                if p >= n || p == i {
                    return Err(RcpspError::InvalidTaskReference {
                        task: i,
                        reference: p,
                    });
                }
                successors[p].push(i);
            }
        }

        Ok(Self {
            tasks,
            elements,
            successors,
        })
    }

    /// All tasks, in index order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// All elements, in index order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of tasks.
    #[inline]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of elements.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Task by index.
    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Element by index.
    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Indices of tasks that list `task` as a precedence, ascending.
    pub fn successors(&self, task: usize) -> &[usize] {
        self.successors.get(task).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices of elements with positive performance for `skill`, ascending.
    pub fn qualified_elements(&self, skill: &str) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_qualified(skill))
            .map(|(i, _)| i)
            .collect()
    }
}
