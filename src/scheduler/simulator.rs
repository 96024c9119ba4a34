//! Greedy precedence- and resource-aware schedule simulation.
//!
//! # Algorithm
//!
//! Each pass scans the uncompleted tasks (in [`ScanOrder`]) and starts the
//! first one whose precedences have all completed:
//!
//! 1. `start = max(latest precedence completion, earliest ready time of
//!    any element qualified for the task's skill)`.
//! 2. Walk the task's decoded candidate list in order and take elements
//!    until one is busy at `start` or unqualified.
//! 3. If that yields no performance, fall back to the first qualified
//!    element in index order; the task waits for it if it is busy.
//! 4. `duration = floor(task.duration / total performance)`; the assigned
//!    elements are busy until `start + duration`.
//!
//! Every productive pass completes exactly one task, so a schedulable
//! problem needs `task_count` passes. A pass that starts nothing means the
//! remaining tasks wait on each other.
//!
//! # Complexity
//! O(n² · (p + m)) where n=tasks, p=precedences/task, m=elements.

use tracing::instrument;

use super::{ScanOrder, SimulationConfig};
use crate::error::{RcpspError, Result};
use crate::ga::DecodedGenes;
use crate::models::{Assignment, Problem, Schedule};

/// Simulates execution of decoded genes and returns the full schedule.
///
/// When the candidate walk yields nothing, the first qualified element is
/// used even if it is busy, and the task starts once that element is free
/// rather than overlapping its current work. Such assignments carry
/// `fallback = true`.
///
/// # Errors
/// - `LayoutMismatch` if `decoded` covers a different number of tasks.
/// - `NoQualifiedResource` if some task's skill has no qualified element.
/// - `CyclicPrecedence` if a pass cannot start any remaining task.
/// - `Deadlock` if the configured pass budget runs out.
/// - `DurationOverflow` if a tiny combined performance scales a duration,
///   or pushes a completion time, past `i64::MAX`.
///
/// # Example
/// ```
/// use u_rcpsp::ga::{decode, SlotLayout};
/// use u_rcpsp::models::{Element, Problem, Task};
/// use u_rcpsp::scheduler::{simulate, SimulationConfig};
///
/// let problem = Problem::new(
///     vec![Task::new("A", 10, "dev"), Task::new("B", 10, "dev")],
///     vec![Element::new("E1").with_skill("dev", 1.0)],
/// )
/// .unwrap();
/// let layout = SlotLayout::new(problem.task_count(), problem.element_count());
/// let decoded = decode(&vec![false; layout.chromosome_length()], &layout).unwrap();
///
/// let schedule = simulate(&problem, &decoded, &SimulationConfig::default()).unwrap();
/// assert_eq!(schedule.makespan(), 20);
/// ```
#[instrument(level = "debug", skip_all, fields(tasks = problem.task_count(), scan_order = ?config.scan_order))]
pub fn simulate(
    problem: &Problem,
    decoded: &DecodedGenes,
    config: &SimulationConfig,
) -> Result<Schedule> {
    let n = problem.task_count();
    // `DecodedGenes` is always a permutation; only its size can disagree
    let order = decoded.task_order();
    if order.len() != n {
        return Err(RcpspError::LayoutMismatch {
            expected: n,
            actual: order.len(),
        });
    }

    let qualified = qualified_by_task(problem)?;
    let candidates = decoded.candidates_by_task();
    let scan: Vec<usize> = match config.scan_order {
        ScanOrder::Decoded => order.to_vec(),
        ScanOrder::TaskIndex => (0..n).collect(),
    };

    let mut state = SimState {
        completion: vec![None; n],
        ready: vec![0; problem.element_count()],
    };
    let mut assignments: Vec<Option<Assignment>> = vec![None; n];
    let budget = config.pass_budget(n);
    let mut remaining = n;
    let mut passes = 0;

    while remaining > 0 {
        if passes >= budget {
            tracing::warn!(passes, remaining, "Simulation pass budget exhausted");
            return Err(RcpspError::Deadlock { passes });
        }
        passes += 1;

        let next = scan.iter().copied().find_map(|task| {
            if state.completion[task].is_some() {
                return None;
            }
            state
                .earliest_start(problem, task, &qualified[task])
                .map(|start| (task, start))
        });

        let Some((task, start)) = next else {
            tracing::warn!(
                placed = n - remaining,
                total = n,
                "No remaining task can start"
            );
            return Err(RcpspError::CyclicPrecedence {
                placed: n - remaining,
                total: n,
            });
        };

        let assignment = state.assign(problem, task, start, candidates[task], &qualified[task])?;
        tracing::trace!(
            task,
            start = assignment.start,
            end = assignment.end,
            elements = ?assignment.elements,
            fallback = assignment.fallback,
            "Task assigned"
        );
        assignments[task] = Some(assignment);
        remaining -= 1;
    }

    Ok(Schedule {
        task_order: order.to_vec(),
        assignments: assignments.into_iter().flatten().collect(),
    })
}

/// Simulates and returns only the makespan (the GA fitness).
pub fn makespan(problem: &Problem, decoded: &DecodedGenes, config: &SimulationConfig) -> Result<i64> {
    simulate(problem, decoded, config).map(|s| s.makespan())
}

/// Qualified element indices per task; fails on the first task with none.
fn qualified_by_task(problem: &Problem) -> Result<Vec<Vec<usize>>> {
    problem
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let elements = problem.qualified_elements(&task.skill);
            if elements.is_empty() {
                Err(RcpspError::NoQualifiedResource {
                    task: i,
                    skill: task.skill.clone(),
                })
            } else {
                Ok(elements)
            }
        })
        .collect()
}

/// Mutable simulation state, indexed by task and element index.
struct SimState {
    /// Completion time per task (`None` = not yet completed).
    completion: Vec<Option<i64>>,
    /// Time each element becomes free.
    ready: Vec<i64>,
}

impl SimState {
    /// Earliest start of `task`, or `None` while a precedence is pending.
    fn earliest_start(&self, problem: &Problem, task: usize, qualified: &[usize]) -> Option<i64> {
        let mut prec_ready = 0;
        for &p in &problem.tasks()[task].precedences {
            prec_ready = prec_ready.max(self.completion[p]?);
        }
        let element_ready = qualified.iter().map(|&e| self.ready[e]).min()?;
        Some(prec_ready.max(element_ready))
    }

    /// Assigns elements to `task` starting at `start` and records the result.
    ///
    /// Fails with `DurationOverflow` when the scaled duration or the
    /// completion time leaves the `i64` range.
    fn assign(
        &mut self,
        problem: &Problem,
        task: usize,
        start: i64,
        candidates: &[usize],
        qualified: &[usize],
    ) -> Result<Assignment> {
        let t = &problem.tasks()[task];
        let mut total_performance = 0.0;
        let mut elements = Vec::new();

        for &e in candidates {
            let Some(element) = problem.element(e) else {
                break;
            };
            if self.ready[e] > start {
                break;
            }
            let performance = element.skill_performance(&t.skill);
            if performance <= 0.0 {
                break;
            }
            total_performance += performance;
            elements.push(e);
        }

        let mut start = start;
        let mut fallback = false;
        if total_performance <= 0.0 {
            // `qualified` is never empty: checked before the loop.
            let e = qualified[0];
            total_performance = problem.elements()[e].skill_performance(&t.skill);
            elements = vec![e];
            start = start.max(self.ready[e]);
            fallback = true;
            tracing::debug!(task, element = e, "Falling back to first qualified element");
        }

        let overflow = RcpspError::DurationOverflow { task, start };
        let scaled = (t.duration as f64 / total_performance).floor();
        // `as` saturates; anything at or past 2^63 does not fit
        if !scaled.is_finite() || scaled >= i64::MAX as f64 {
            tracing::warn!(task, scaled, "Scaled duration out of range");
            return Err(overflow);
        }
        let end = start.checked_add(scaled as i64).ok_or(overflow)?;

        self.completion[task] = Some(end);
        for &e in &elements {
            self.ready[e] = end;
        }

        Ok(Assignment::new(task, elements, start, end).with_fallback(fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{SlotLayout, decode};
    use crate::models::{Element, Task};

    /// Builds genes from explicit slot contents.
    fn genes_for(problem: &Problem, ids: &[usize], masks: &[&[usize]]) -> DecodedGenes {
        let layout = SlotLayout::new(problem.task_count(), problem.element_count());
        let mut genes = vec![false; layout.chromosome_length()];
        for (slot, (&id, mask)) in ids.iter().zip(masks).enumerate() {
            layout.write_task_id(&mut genes, slot, id);
            let start = layout.mask_range(slot).start;
            for &e in *mask {
                genes[start + e] = true;
            }
        }
        decode(&genes, &layout).unwrap()
    }

    fn serial_problem() -> Problem {
        Problem::new(
            vec![
                Task::new("A", 10, "dev"),
                Task::new("B", 10, "dev"),
                Task::new("C", 10, "dev"),
            ],
            vec![Element::new("E1").with_skill("dev", 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_single_element_runs_serially() {
        let p = serial_problem();
        let config = SimulationConfig::default();
        for masks in [[&[][..], &[], &[]], [&[0][..], &[0], &[0]], [&[0][..], &[], &[0]]] {
            let d = genes_for(&p, &[2, 0, 1], &masks);
            let s = simulate(&p, &d, &config).unwrap();
            assert_eq!(s.makespan(), 30);
            assert!(s.is_feasible(&p));
        }
    }

    #[test]
    fn test_precedence_forces_order() {
        // A precedes B
        let p = Problem::new(
            vec![
                Task::new("A", 12, "dev"),
                Task::new("B", 7, "dev").with_precedence(0),
            ],
            vec![
                Element::new("E1").with_skill("dev", 1.0),
                Element::new("E2").with_skill("dev", 1.0),
            ],
        )
        .unwrap();

        for ids in [[0, 1], [1, 0]] {
            for scan_order in [ScanOrder::Decoded, ScanOrder::TaskIndex] {
                let config = SimulationConfig::new().with_scan_order(scan_order);
                let d = genes_for(&p, &ids, &[&[0], &[1]]);
                let s = simulate(&p, &d, &config).unwrap();
                assert_eq!(s.completion_order(), vec![0, 1]);
                assert_eq!(s.start_time(1), Some(12));
                assert_eq!(s.makespan(), 19);
            }
        }
    }

    #[test]
    fn test_performance_shortens_duration() {
        let p = Problem::new(
            vec![Task::new("A", 10, "dev")],
            vec![
                Element::new("E1").with_skill("dev", 1.0),
                Element::new("E2").with_skill("dev", 1.5),
            ],
        )
        .unwrap();

        // both candidates: 10 / 2.5 = 4
        let d = genes_for(&p, &[0], &[&[0, 1]]);
        let s = simulate(&p, &d, &SimulationConfig::default()).unwrap();
        assert_eq!(s.makespan(), 4);
        assert_eq!(s.assignment(0).unwrap().elements, vec![0, 1]);

        // only E2: floor(10 / 1.5) = 6
        let d = genes_for(&p, &[0], &[&[1]]);
        assert_eq!(makespan(&p, &d, &SimulationConfig::default()).unwrap(), 6);
    }

    #[test]
    fn test_candidate_walk_stops_at_unqualified() {
        let p = Problem::new(
            vec![Task::new("A", 12, "dev")],
            vec![
                Element::new("E1").with_skill("dev", 1.0),
                Element::new("E2").with_skill("qa", 1.0),
                Element::new("E3").with_skill("dev", 1.0),
            ],
        )
        .unwrap();

        // E2 is unqualified, so E3 is never reached
        let d = genes_for(&p, &[0], &[&[0, 1, 2]]);
        let s = simulate(&p, &d, &SimulationConfig::default()).unwrap();
        assert_eq!(s.assignment(0).unwrap().elements, vec![0]);
        assert_eq!(s.makespan(), 12);
    }

    #[test]
    fn test_fallback_when_candidates_empty() {
        let p = Problem::new(
            vec![Task::new("A", 10, "dev")],
            vec![
                Element::new("E1").with_skill("qa", 1.0),
                Element::new("E2").with_skill("dev", 2.0),
            ],
        )
        .unwrap();

        let d = genes_for(&p, &[0], &[&[0]]);
        let s = simulate(&p, &d, &SimulationConfig::default()).unwrap();
        let a = s.assignment(0).unwrap();
        assert!(a.fallback);
        assert_eq!(a.elements, vec![1]);
        assert_eq!(a.end, 5);
    }

    #[test]
    fn test_fallback_waits_for_busy_element() {
        // E1 is first qualified but busy; E2 is free. B's candidates are empty.
        let p = Problem::new(
            vec![Task::new("A", 10, "dev"), Task::new("B", 4, "dev")],
            vec![
                Element::new("E1").with_skill("dev", 1.0),
                Element::new("E2").with_skill("dev", 1.0),
            ],
        )
        .unwrap();

        let d = genes_for(&p, &[0, 1], &[&[0], &[]]);
        let s = simulate(&p, &d, &SimulationConfig::default()).unwrap();
        let b = s.assignment(1).unwrap();
        assert!(b.fallback);
        assert_eq!(b.elements, vec![0]);
        assert_eq!(b.start, 10);
        assert!(s.is_feasible(&p));
    }

    #[test]
    fn test_parallel_elements() {
        let p = Problem::new(
            vec![Task::new("A", 10, "dev"), Task::new("B", 10, "dev")],
            vec![
                Element::new("E1").with_skill("dev", 1.0),
                Element::new("E2").with_skill("dev", 1.0),
            ],
        )
        .unwrap();

        let d = genes_for(&p, &[0, 1], &[&[0], &[1]]);
        let s = simulate(&p, &d, &SimulationConfig::default()).unwrap();
        assert_eq!(s.makespan(), 10);
        assert_eq!(s.start_time(1), Some(0));
    }

    #[test]
    fn test_scan_order_changes_priority() {
        let p = serial_problem();
        let d = genes_for(&p, &[2, 1, 0], &[&[0], &[0], &[0]]);

        // default scan walks task indices regardless of the decoded order
        let s = simulate(&p, &d, &SimulationConfig::default()).unwrap();
        assert_eq!(s.completion_order(), vec![0, 1, 2]);
        // candidates follow the task, not the position
        assert_eq!(s.makespan(), 30);

        let config = SimulationConfig::new().with_scan_order(ScanOrder::Decoded);
        let s = simulate(&p, &d, &config).unwrap();
        assert_eq!(s.completion_order(), vec![2, 1, 0]);
    }

    #[test]
    fn test_duplicate_slot_ids_still_schedule_every_task() {
        let p = serial_problem();
        // slots name task 0 twice; task 2 comes from the repair step
        let d = genes_for(&p, &[0, 0, 1], &[&[0], &[0], &[0]]);
        assert_eq!(d.task_order(), &[0, 1, 2]);
        for scan_order in [ScanOrder::TaskIndex, ScanOrder::Decoded] {
            let config = SimulationConfig::new().with_scan_order(scan_order);
            let s = simulate(&p, &d, &config).unwrap();
            assert_eq!(s.assignments.len(), 3);
            assert_eq!(s.makespan(), 30);
        }
    }

    #[test]
    fn test_foreign_element_indices_ignored() {
        // same task count, but the genes carry masks for four elements
        let p = serial_problem();
        let layout = SlotLayout::new(3, 4);
        let d = decode(&vec![true; layout.chromosome_length()], &layout).unwrap();
        let s = simulate(&p, &d, &SimulationConfig::default()).unwrap();
        assert!(s.assignments.iter().all(|a| a.elements == vec![0]));
        assert_eq!(s.makespan(), 30);
    }

    #[test]
    fn test_no_qualified_resource() {
        let p = Problem::new(
            vec![Task::new("A", 10, "dev"), Task::new("B", 10, "ops")],
            vec![Element::new("E1").with_skill("dev", 1.0)],
        )
        .unwrap();
        let d = genes_for(&p, &[0, 1], &[&[0], &[0]]);
        let err = simulate(&p, &d, &SimulationConfig::default()).unwrap_err();
        assert_eq!(
            err,
            RcpspError::NoQualifiedResource {
                task: 1,
                skill: "ops".into()
            }
        );
    }

    #[test]
    fn test_cycle_reported() {
        let p = Problem::new(
            vec![
                Task::new("A", 10, "dev"),
                Task::new("B", 10, "dev").with_precedence(2),
                Task::new("C", 10, "dev").with_precedence(1),
            ],
            vec![Element::new("E1").with_skill("dev", 1.0)],
        )
        .unwrap();
        let d = genes_for(&p, &[0, 1, 2], &[&[0], &[0], &[0]]);
        let err = simulate(&p, &d, &SimulationConfig::default()).unwrap_err();
        assert_eq!(err, RcpspError::CyclicPrecedence { placed: 1, total: 3 });
    }

    #[test]
    fn test_pass_budget() {
        let p = serial_problem();
        let d = genes_for(&p, &[0, 1, 2], &[&[0], &[0], &[0]]);
        let config = SimulationConfig::new().with_max_passes(2);
        let err = simulate(&p, &d, &config).unwrap_err();
        assert_eq!(err, RcpspError::Deadlock { passes: 2 });
    }

    #[test]
    fn test_layout_mismatch() {
        let p = serial_problem();
        let layout = SlotLayout::new(2, 1);
        let d = decode(&vec![false; layout.chromosome_length()], &layout).unwrap();
        let err = simulate(&p, &d, &SimulationConfig::default()).unwrap_err();
        assert!(matches!(err, RcpspError::LayoutMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    fn test_tiny_performance_overflows() {
        let p = Problem::new(
            vec![Task::new("A", 10, "dev"), Task::new("B", 10, "dev")],
            vec![Element::new("E1").with_skill("dev", 1e-18)],
        )
        .unwrap();
        let d = genes_for(&p, &[0, 1], &[&[0], &[0]]);
        let err = simulate(&p, &d, &SimulationConfig::default()).unwrap_err();
        assert_eq!(err, RcpspError::DurationOverflow { task: 0, start: 0 });
    }

    #[test]
    fn test_completion_time_overflows() {
        // each duration fits on its own; the second task ends past i64::MAX
        const LONG: i64 = 5_000_000_000_000_000_000;
        let p = Problem::new(
            vec![Task::new("A", LONG, "dev"), Task::new("B", LONG, "dev")],
            vec![Element::new("E1").with_skill("dev", 1.0)],
        )
        .unwrap();
        let d = genes_for(&p, &[0, 1], &[&[0], &[0]]);
        let err = simulate(&p, &d, &SimulationConfig::default()).unwrap_err();
        assert_eq!(err, RcpspError::DurationOverflow { task: 1, start: LONG });
    }

    #[test]
    fn test_idempotent() {
        let p = serial_problem();
        let d = genes_for(&p, &[1, 2, 0], &[&[0], &[], &[0]]);
        let config = SimulationConfig::default();
        assert_eq!(simulate(&p, &d, &config).unwrap(), simulate(&p, &d, &config).unwrap());
    }
}
