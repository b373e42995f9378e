//! Configuration for a grading run

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use plgrade_evaluator::EvaluatorConfig;

/// How submitter names are extracted from submission folder names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingScheme {
    /// `<id> - <x> - <Group> - <N> - ...`: parts 2 and 3 joined by `_`.
    #[default]
    Brightspace,
    /// `..._Group 12_...`: from `Group` up to the next `_`, lowercased.
    Blackboard,
}

impl FromStr for NamingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brightspace" => Ok(Self::Brightspace),
            "blackboard" => Ok(Self::Blackboard),
            other => Err(format!(
                "unknown naming scheme '{}' (expected brightspace or blackboard)",
                other
            )),
        }
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brightspace => f.write_str("brightspace"),
            Self::Blackboard => f.write_str("blackboard"),
        }
    }
}

/// Configuration for a grading run
#[derive(Debug, Clone)]
pub struct GraderConfig {
    /// One subdirectory per exercise
    pub tests_dir: PathBuf,
    /// One file per test-case type
    pub templates_dir: PathBuf,
    /// One subdirectory per submission
    pub assignments_dir: PathBuf,
    pub naming: NamingScheme,
    /// Where scratch files go; a temporary directory when unset
    pub scratch_dir: Option<PathBuf>,
    /// Where to write the JSON run summary, if anywhere
    pub summary_path: Option<PathBuf>,
    pub evaluator: EvaluatorConfig,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            tests_dir: PathBuf::from("tests"),
            templates_dir: PathBuf::from("test_templates"),
            assignments_dir: PathBuf::from("assignments"),
            naming: NamingScheme::default(),
            scratch_dir: None,
            summary_path: None,
            evaluator: EvaluatorConfig::default(),
        }
    }
}

impl GraderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tests_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tests_dir = dir.into();
        self
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    pub fn with_assignments_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assignments_dir = dir.into();
        self
    }

    pub fn with_naming(mut self, naming: NamingScheme) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn with_summary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_path = Some(path.into());
        self
    }

    pub fn with_evaluator(mut self, evaluator: EvaluatorConfig) -> Self {
        self.evaluator = evaluator;
        self
    }
}
