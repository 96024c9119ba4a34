//! Feasible random initialization.
//!
//! Samples a random linear extension of the precedence DAG (randomized
//! Kahn's algorithm) and writes it into the task-ID fields, so that the
//! decoder reproduces exactly that order. Resource-preference bits are
//! uniform random.
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks"

use rand::Rng;

use super::SlotLayout;
use crate::error::{RcpspError, Result};
use crate::models::Problem;

/// Returns a random topological order of the task indices.
///
/// At every step one task is drawn uniformly from the current set of
/// sources (tasks whose precedences are all placed). Every topological
/// order can come out, but not with equal probability: orders that keep
/// more sources available early are drawn less often.
///
/// # Errors
/// `CyclicPrecedence` if the precedence graph is not acyclic.
pub fn random_topological_order<R: Rng>(problem: &Problem, rng: &mut R) -> Result<Vec<usize>> {
    let n = problem.task_count();
    let mut in_degree: Vec<usize> = problem
        .tasks()
        .iter()
        .map(|t| t.precedences.len())
        .collect();
    let mut sources: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while !sources.is_empty() {
        let pick = rng.random_range(0..sources.len());
        let task = sources.swap_remove(pick);
        order.push(task);

        for &succ in problem.successors(task) {
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                sources.push(succ);
            }
        }
    }

    if order.len() < n {
        tracing::warn!(placed = order.len(), total = n, "Precedence graph has a cycle");
        return Err(RcpspError::CyclicPrecedence {
            placed: order.len(),
            total: n,
        });
    }
    Ok(order)
}

/// Builds a gene buffer encoding a random feasible task order.
///
/// Slot `i` receives the i-th task of a random topological order in its
/// task-ID field and uniform random bits in its mask.
pub fn feasible_genes<R: Rng>(
    problem: &Problem,
    layout: &SlotLayout,
    rng: &mut R,
) -> Result<Vec<bool>> {
    let order = random_topological_order(problem, rng)?;
    let mut genes = vec![false; layout.chromosome_length()];

    for (slot, &task) in order.iter().enumerate() {
        layout.write_task_id(&mut genes, slot, task);
        for bit in &mut genes[layout.mask_range(slot)] {
            *bit = rng.random_bool(0.5);
        }
    }

    Ok(genes)
}
