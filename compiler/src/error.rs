//! Synthesis errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The case's type has no registered template.
    #[error("no template registered for type '{test_type}' (test '{test}')")]
    TemplateMissing { test: String, test_type: String },

    /// A composed query was requested for zero cases.
    #[error("cannot compose a query from zero test cases")]
    NothingToCompose,
}

impl SynthesisError {
    pub fn template_missing(test: impl Into<String>, test_type: impl Into<String>) -> Self {
        Self::TemplateMissing {
            test: test.into(),
            test_type: test_type.into(),
        }
    }
}

/// Result type for synthesis.
pub type SynthesisResult<T> = Result<T, SynthesisError>;
