//! Grading run errors.
//!
//! Everything here is fatal to the run. Per-case and per-submission
//! evaluator problems are recorded on the cases instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradeError {
    /// A test description is malformed.
    #[error("invalid test description: {0}")]
    Dsl(#[from] plgrade_parser::DslError),

    /// Templates could not be loaded.
    #[error("template registry: {0}")]
    Registry(#[from] plgrade_registry::RegistryError),

    /// The evaluator could not be started.
    #[error("evaluator: {0}")]
    Evaluator(#[from] plgrade_evaluator::EvaluatorError),

    /// A required directory is missing.
    #[error("directory does not exist: {}", path.display())]
    MissingDirectory { path: PathBuf },

    /// Filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run summary could not be serialized.
    #[error("failed to serialize run summary: {0}")]
    Summary(#[from] serde_json::Error),
}

impl GradeError {
    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory { path: path.into() }
    }

    /// Adapter for `map_err` that tags an I/O error with its path.
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for grading runs.
pub type GradeResult<T> = Result<T, GradeError>;
