//! Test cases and their verdicts.

use std::fmt;

use serde::Serialize;

use crate::{Expected, Goal, FAIL_TOKEN, PASS_TOKEN};

/// Verdict of a single test case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Not run yet, or the evaluator printed no recognizable verdict.
    #[default]
    Unknown,
    Pass,
    Fail,
}

impl Outcome {
    /// Interpret a verdict token printed by the evaluator.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            PASS_TOKEN => Outcome::Pass,
            FAIL_TOKEN => Outcome::Fail,
            _ => Outcome::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Unknown => "unknown",
            Outcome::Pass => PASS_TOKEN,
            Outcome::Fail => FAIL_TOKEN,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single instructor-defined test case.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// Unique name within the suite.
    pub name: String,
    /// Key into the template registry.
    pub test_type: String,
    pub goal: Goal,
    pub expected: Expected,

    /// Values printed by the evaluator on the last run (`Var=Value` strings,
    /// or a single diagnostic when the run errored).
    pub result: Vec<String>,
    /// Verdict of the last run.
    pub success: Outcome,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        test_type: impl Into<String>,
        goal: Goal,
        expected: Expected,
    ) -> Self {
        Self {
            name: name.into(),
            test_type: test_type.into(),
            goal,
            expected,
            result: Vec::new(),
            success: Outcome::Unknown,
        }
    }

    /// Clear scratch fields left over from a previous run.
    pub fn reset(&mut self) {
        self.result.clear();
        self.success = Outcome::Unknown;
    }

    /// Store the values and verdict decoded from evaluator output.
    pub fn record(&mut self, result: Vec<String>, success: Outcome) {
        self.result = result;
        self.success = success;
    }

    /// Mark the case as failed with a diagnostic in place of its values.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.result = vec![message.into()];
        self.success = Outcome::Fail;
    }
}
