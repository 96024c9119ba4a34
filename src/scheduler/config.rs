//! Simulation configuration.

use serde::{Deserialize, Serialize};

/// The order in which the simulator scans uncompleted tasks each pass.
///
/// Whatever the scan order, candidate lists and all simulation state
/// are keyed by task index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOrder {
    /// Problem index order (0, 1, 2, ...), independent of the chromosome.
    #[default]
    TaskIndex,
    /// Decoded task order: the chromosome's order acts as a priority list.
    Decoded,
}

/// Simulator settings.
///
/// # Example
/// ```
/// use u_rcpsp::scheduler::{ScanOrder, SimulationConfig};
///
/// let config: SimulationConfig =
///     serde_json::from_str(r#"{ "scan_order": "decoded" }"#).unwrap();
/// assert_eq!(config.scan_order, ScanOrder::Decoded);
/// assert_eq!(config.max_passes, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Scan order for picking the next task to start.
    pub scan_order: ScanOrder,
    /// Upper bound on simulation passes. `None` = one pass per task,
    /// which is exactly enough for any schedulable problem.
    pub max_passes: Option<usize>,
}

impl SimulationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scan order.
    pub fn with_scan_order(mut self, scan_order: ScanOrder) -> Self {
        self.scan_order = scan_order;
        self
    }

    /// Sets the pass budget.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    /// Effective pass budget for a problem with `task_count` tasks.
    pub fn pass_budget(&self, task_count: usize) -> usize {
        self.max_passes.unwrap_or(task_count)
    }
}
