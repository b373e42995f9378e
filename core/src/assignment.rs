//! Student submissions.

use std::path::PathBuf;

/// The knowledge submitted by one group, built once during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Submitter (group) name extracted from the submission folder.
    pub name: String,
    /// Submission folder; reports are written here.
    pub path: PathBuf,
    /// Concatenated, comment-stripped source of every discovered file.
    pub knowledge: String,
}

impl Assignment {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, knowledge: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            knowledge: knowledge.into(),
        }
    }
}
