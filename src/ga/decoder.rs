//! Repairing decoder.
//!
//! Turns any correctly-sized bit string into a full task permutation and
//! one candidate-element list per task. Only the buffer length is
//! checked; the bit contents never cause a failure:
//!
//! 1. Slots are read in physical order. A task-ID field that is out of
//!    range or repeats an earlier ID is skipped.
//! 2. Tasks never placed by step 1 are appended in ascending index order,
//!    taking their candidate mask from the slot at their own index.
//! 3. Each placed task's candidate list is the set bits of its slot mask,
//!    in ascending element order.

use super::SlotLayout;
use crate::error::{RcpspError, Result};

/// Output of [`decode`].
///
/// Only the decoder builds these, so `task_order` is always a
/// permutation of `0..task_count` with one candidate list per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedGenes {
    task_order: Vec<usize>,
    candidates: Vec<Vec<usize>>,
    repaired: usize,
}

impl DecodedGenes {
    /// Permutation of `0..task_count`.
    pub fn task_order(&self) -> &[usize] {
        &self.task_order
    }

    /// Candidate element lists, parallel to `task_order`.
    pub fn candidates(&self) -> &[Vec<usize>] {
        &self.candidates
    }

    /// Number of tasks appended by the repair step.
    pub fn repaired(&self) -> usize {
        self.repaired
    }

    /// Candidate lists re-keyed by task index.
    ///
    /// `candidates_by_task()[t]` is the list decoded for task `t`,
    /// wherever `t` sits in `task_order`.
    pub fn candidates_by_task(&self) -> Vec<&[usize]> {
        let empty: &[usize] = &[];
        let mut by_task = vec![empty; self.task_order.len()];
        for (&task, list) in self.task_order.iter().zip(&self.candidates) {
            by_task[task] = list.as_slice();
        }
        by_task
    }

    /// Position of every task in `task_order`.
    pub fn positions(&self) -> Vec<usize> {
        let mut pos = vec![0; self.task_order.len()];
        for (i, &task) in self.task_order.iter().enumerate() {
            pos[task] = i;
        }
        pos
    }
}

/// Decodes a gene buffer laid out per `layout`.
///
/// # Errors
/// `InvalidGeneLength` if `genes` is not `layout.chromosome_length()` bits.
///
/// # Example
/// ```
/// use u_rcpsp::ga::{decode, SlotLayout};
///
/// let layout = SlotLayout::new(3, 2);
/// let genes = vec![false; layout.chromosome_length()];
/// let decoded = decode(&genes, &layout).unwrap();
/// // every slot says "task 0": 0 is placed once, 1 and 2 are repaired
/// assert_eq!(decoded.task_order(), &[0, 1, 2]);
/// assert_eq!(decoded.repaired(), 2);
///
/// assert!(decode(&genes[1..], &layout).is_err());
/// ```
pub fn decode(genes: &[bool], layout: &SlotLayout) -> Result<DecodedGenes> {
    let expected = layout.chromosome_length();
    if genes.len() != expected {
        return Err(RcpspError::InvalidGeneLength {
            expected,
            actual: genes.len(),
        });
    }
    Ok(decode_slots(genes, layout))
}

/// Decodes a buffer already known to match `layout`.
pub(crate) fn decode_slots(genes: &[bool], layout: &SlotLayout) -> DecodedGenes {
    let n = layout.task_count;
    let mut placed = vec![false; n];
    let mut task_order = Vec::with_capacity(n);
    let mut candidates = Vec::with_capacity(n);

    for slot in 0..n {
        let id = layout.read_task_id(genes, slot);
        let Ok(task) = usize::try_from(id) else {
            continue;
        };
        if task >= n || placed[task] {
            continue;
        }
        placed[task] = true;
        task_order.push(task);
        candidates.push(layout.read_mask(genes, slot));
    }

    let repaired = n - task_order.len();
    if repaired > 0 {
        tracing::trace!(repaired, "Repairing missing task IDs");
        for task in (0..n).filter(|&t| !placed[t]) {
            task_order.push(task);
            candidates.push(layout.read_mask(genes, task));
        }
    }

    DecodedGenes {
        task_order,
        candidates,
        repaired,
    }
}
