//! Discrete-event schedule simulation.
//!
//! Turns decoded genes into a [`Schedule`](crate::models::Schedule) and a
//! makespan. The simulator is greedy: each pass starts the first ready task
//! in scan order with whichever preferred elements are free.
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

mod config;
mod simulator;

pub use config::{ScanOrder, SimulationConfig};
pub use simulator::{makespan, simulate};
