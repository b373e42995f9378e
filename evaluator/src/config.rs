//! Evaluator configuration

use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the external evaluator is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Evaluator executable.
    pub program: String,
    /// Global stack bound for test runs; small enough that runaway
    /// recursion fails fast.
    pub stack_limit: String,
    /// Global stack bound for the knowledge sanity check.
    pub check_stack_limit: String,
    /// Wall-clock bound per invocation.
    pub timeout: Duration,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            program: "swipl".to_string(),
            stack_limit: "128k".to_string(),
            check_stack_limit: "1m".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl EvaluatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_stack_limit(mut self, limit: impl Into<String>) -> Self {
        self.stack_limit = limit.into();
        self
    }

    pub fn with_check_stack_limit(mut self, limit: impl Into<String>) -> Self {
        self.check_stack_limit = limit.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
