//! Bit layout of a chromosome.
//!
//! A chromosome is `task_count` equal-width slots. Each slot holds a
//! task-ID field of `task_bits` bits followed by an `element_bits`-wide
//! resource-preference mask:
//!
//! ```text
//! | task id (MSB..LSB) | e0 e1 ... e(m-1) | task id | e0 ... | ...
//! |<----- task_bits --->|<- element_bits ->|
//! ```
//!
//! Task-ID fields are big-endian unsigned binary, shared by the encoder
//! and the decoder.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Minimum number of bits used to encode a task index for `n` tasks.
///
/// Returns `n` for `n <= 1`, otherwise `floor(log2(n - 1)) + 1`.
///
/// # Example
/// ```
/// use u_rcpsp::ga::min_bits;
///
/// assert_eq!(min_bits(1), 1);
/// assert_eq!(min_bits(2), 1);
/// assert_eq!(min_bits(5), 3);
/// assert_eq!(min_bits(8), 3);
/// assert_eq!(min_bits(9), 4);
/// ```
pub fn min_bits(n: usize) -> usize {
    if n <= 1 {
        return n;
    }
    (usize::BITS - (n - 1).leading_zeros()) as usize
}

/// Slot geometry for a problem of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotLayout {
    /// Width of the task-ID field.
    pub task_bits: usize,
    /// Width of the resource-preference mask (one bit per element).
    pub element_bits: usize,
    /// Number of slots (one per task).
    pub task_count: usize,
}

impl SlotLayout {
    /// Computes the layout for `task_count` tasks and `element_count` elements.
    pub fn new(task_count: usize, element_count: usize) -> Self {
        Self {
            task_bits: min_bits(task_count),
            element_bits: element_count,
            task_count,
        }
    }

    /// Bits per slot.
    #[inline]
    pub fn slot_width(&self) -> usize {
        self.task_bits + self.element_bits
    }

    /// Total chromosome length in bits.
    #[inline]
    pub fn chromosome_length(&self) -> usize {
        self.task_count * self.slot_width()
    }

    /// First bit of a slot.
    #[inline]
    pub fn slot_offset(&self, slot: usize) -> usize {
        slot * self.slot_width()
    }

    /// Bit range of a slot's task-ID field.
    pub fn task_id_range(&self, slot: usize) -> Range<usize> {
        let start = self.slot_offset(slot);
        start..start + self.task_bits
    }

    /// Bit range of a slot's resource-preference mask.
    pub fn mask_range(&self, slot: usize) -> Range<usize> {
        let start = self.slot_offset(slot) + self.task_bits;
        start..start + self.element_bits
    }

    /// Reads a slot's task-ID field as an unsigned integer (MSB first).
    ///
    /// The value may be `>= task_count` when the field width rounds up.
    pub fn read_task_id(&self, genes: &[bool], slot: usize) -> u64 {
        genes[self.task_id_range(slot)]
            .iter()
            .fold(0u64, |n, &bit| (n << 1) | u64::from(bit))
    }

    /// Writes `id` into a slot's task-ID field (MSB first).
    ///
    /// Bits of `id` above `task_bits` are dropped.
    pub fn write_task_id(&self, genes: &mut [bool], slot: usize, id: usize) {
        let field = &mut genes[self.task_id_range(slot)];
        let width = field.len();
        for (j, bit) in field.iter_mut().enumerate() {
            let shift = width - 1 - j;
            *bit = shift < usize::BITS as usize && (id >> shift) & 1 == 1;
        }
    }

    /// Element indices whose bit is set in a slot's mask, ascending.
    pub fn read_mask(&self, genes: &[bool], slot: usize) -> Vec<usize> {
        genes[self.mask_range(slot)]
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit)
            .map(|(e, _)| e)
            .collect()
    }
}
