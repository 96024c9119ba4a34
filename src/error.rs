//! Typed failures for problem construction, decoding, and simulation.
//!
//! Gene-level anomalies (out-of-range or duplicate task-ID fields) are
//! repaired by the decoder and never surface here.

/// Errors produced by the RCPSP core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RcpspError {
    /// The problem has no tasks or no elements.
    #[error("InvalidProblemSize: tasks={tasks}, elements={elements}")]
    InvalidProblemSize { tasks: usize, elements: usize },

    /// A task's duration is zero or negative.
    #[error("InvalidDuration: task={task}, duration={duration}")]
    InvalidDuration { task: usize, duration: i64 },

    /// A precedence refers to a task index that does not exist, or to itself.
    #[error("InvalidTaskReference: task={task} references {reference}")]
    InvalidTaskReference { task: usize, reference: usize },

    /// The precedence graph contains a cycle; only `placed` of `total`
    /// tasks could be ordered or scheduled.
    #[error("CyclicPrecedence: placed {placed} of {total} tasks")]
    CyclicPrecedence { placed: usize, total: usize },

    /// No element in the whole problem can perform the task's skill.
    #[error("NoQualifiedResource: task={task}, skill={skill}")]
    NoQualifiedResource { task: usize, skill: String },

    /// A task's scaled duration or completion time does not fit in `i64`.
    #[error("DurationOverflow: task={task}, start={start}")]
    DurationOverflow { task: usize, start: i64 },

    /// The simulation pass budget ran out before every task completed.
    #[error("Deadlock: simulation exceeded {passes} passes")]
    Deadlock { passes: usize },

    /// A raw bit string does not match the problem's chromosome length.
    #[error("InvalidGeneLength: expected {expected}, got {actual}")]
    InvalidGeneLength { expected: usize, actual: usize },

    /// Decoded genes were produced for a problem with a different task count.
    #[error("LayoutMismatch: problem has {expected} tasks, decoded genes cover {actual}")]
    LayoutMismatch { expected: usize, actual: usize },

    /// A gene index passed to a mutation primitive is past the end.
    #[error("GeneIndexOutOfRange: index={index}, length={length}")]
    GeneIndexOutOfRange { index: usize, length: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RcpspError>;
