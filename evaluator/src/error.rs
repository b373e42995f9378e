//! Evaluator error types.

use std::time::Duration;

use thiserror::Error;

/// The evaluator could not be run at all.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("failed to start evaluator '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for evaluator: {0}")]
    Wait(#[source] std::io::Error),
}

/// Result type for evaluator invocations.
pub type EvaluatorResult<T> = Result<T, EvaluatorError>;

/// Why an invocation's output cannot be attributed to test cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunFailure {
    /// stderr carried the error marker.
    #[error("evaluator reported an error: {diagnostic}")]
    Evaluator { diagnostic: String },

    /// The wall-clock bound tripped and the process was killed.
    #[error("evaluator timed out after {0:?}")]
    TimedOut(Duration),

    /// A fused run printed a different number of records than cases submitted.
    #[error("expected {expected} result records, found {found}")]
    Malformed { expected: usize, found: usize },
}
