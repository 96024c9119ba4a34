//! Bit-string GA encoding for project scheduling.
//!
//! A chromosome is a fixed-length bit string split into one slot per task.
//! Each slot carries a task-ID field and a resource-preference mask. The
//! encoding is repaired on decode, so every bit string of the right length
//! (crossover children, mutants, all-zero buffers) yields a valid schedule.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable crossover and mutation strategies
//!
//! # Pipeline
//!
//! initializer → decoder → [`crate::scheduler::simulate`]
//!
//! # Reference
//! Hartmann (1998), "A competitive genetic algorithm for resource-constrained
//! project scheduling"

mod chromosome;
mod decoder;
mod initializer;
mod layout;
pub mod operators;

pub use chromosome::{BitChromosome, sort_population};
pub use decoder::{DecodedGenes, decode};
pub use initializer::{feasible_genes, random_topological_order};
pub use layout::{SlotLayout, min_bits};
