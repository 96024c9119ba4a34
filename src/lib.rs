//! Genetic encoding core for resource-constrained project scheduling (RCPSP).
//!
//! Encodes a candidate schedule as a fixed-length bit string, repairs any
//! bit string into a precedence-respecting task order with per-task element
//! preferences, and simulates execution to a single makespan fitness.
//! Population management, selection, and the convergence loop belong to
//! the GA driver that consumes this crate.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `Element`, `Problem`, `Schedule`
//! - **`ga`**: Bit layout, feasible initializer, repairing decoder, `BitChromosome`
//! - **`scheduler`**: Greedy simulator and its configuration
//! - **`validation`**: Whole-problem checks (duplicate IDs, DAG cycles, unqualified skills)
//! - **`error`**: Typed failures
//!
//! # Concurrency
//!
//! A `Problem` is immutable and shared as `Arc<Problem>`; each chromosome
//! evaluates with local state only, so chromosomes can be evaluated on
//! separate threads without locking.
//!
//! # References
//!
//! - Kolisch & Hartmann (1999), "Heuristic Algorithms for the
//!   Resource-Constrained Project Scheduling Problem"
//! - Hartmann (1998), "A competitive genetic algorithm for resource-constrained
//!   project scheduling"

pub mod error;
pub mod ga;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{RcpspError, Result};
