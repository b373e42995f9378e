//! Test description errors.
//!
//! All of these are fatal: a malformed test description aborts the run
//! before any evaluator is started.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DslError {
    /// A record line does not split into exactly four tab-separated fields.
    #[error("line {line}: expected 4 tab-separated fields (name, goal, type, expected), found {found}")]
    FieldCount { line: usize, found: usize },

    /// Two test cases share a name.
    #[error("line {line}: duplicate test name '{name}'")]
    DuplicateName { line: usize, name: String },

    /// `GROUP:` without a name.
    #[error("line {line}: group declaration without a name")]
    EmptyGroupName { line: usize },

    /// An expected entry lacks the `=` between variable and value.
    #[error("line {line}: expected entry '{entry}' in test '{test}' is not of the form Var=Value")]
    MalformedExpected {
        line: usize,
        test: String,
        entry: String,
    },

    /// An expected variable does not start with an uppercase character.
    #[error("line {line}: variable '{var}' in test '{test}' should start with an uppercase character")]
    LowercaseVariable {
        line: usize,
        test: String,
        var: String,
    },

    /// An expected variable is neither declared in the goal nor `Result`.
    #[error("line {line}: variable '{var}' is not present in the goal of test '{test}'")]
    UnboundVariable {
        line: usize,
        test: String,
        var: String,
    },

    /// The test description could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any of the above, located in a file.
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<DslError>,
    },
}

impl DslError {
    pub fn field_count(line: usize, found: usize) -> Self {
        Self::FieldCount { line, found }
    }

    pub fn duplicate_name(line: usize, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            line,
            name: name.into(),
        }
    }

    pub fn malformed_expected(line: usize, test: impl Into<String>, entry: impl Into<String>) -> Self {
        Self::MalformedExpected {
            line,
            test: test.into(),
            entry: entry.into(),
        }
    }

    pub fn lowercase_variable(line: usize, test: impl Into<String>, var: impl Into<String>) -> Self {
        Self::LowercaseVariable {
            line,
            test: test.into(),
            var: var.into(),
        }
    }

    pub fn unbound_variable(line: usize, test: impl Into<String>, var: impl Into<String>) -> Self {
        Self::UnboundVariable {
            line,
            test: test.into(),
            var: var.into(),
        }
    }

    pub fn in_file(path: impl Into<PathBuf>, source: DslError) -> Self {
        Self::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Line of the offending input, if the error is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::FieldCount { line, .. }
            | Self::DuplicateName { line, .. }
            | Self::EmptyGroupName { line }
            | Self::MalformedExpected { line, .. }
            | Self::LowercaseVariable { line, .. }
            | Self::UnboundVariable { line, .. } => Some(*line),
            Self::Io { .. } => None,
            Self::InFile { source, .. } => source.line(),
        }
    }
}

/// Result type for test description parsing.
pub type DslResult<T> = Result<T, DslError>;
