//! Per-exercise execution.
//!
//! Every exercise first runs as one fused query. If that cannot be
//! synthesized, or its output cannot be attributed to cases, each case is
//! run on its own instead. Both paths leave the cases in the same shape.

use std::time::Duration;

use plgrade_compiler::{SynthesisError, Synthesizer};
use plgrade_core::{Test, TestCase, ERROR_LINE_MARKER};
use plgrade_evaluator::{
    build_goal, check_goal, decode_composed, decode_single, error_diagnostic, Evaluator, Purpose,
    query_file, RawOutput, RunFailure, COMPOSED_FILE,
};
use plgrade_registry::TemplateRegistry;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{GradeResult, Scratch};

/// How an exercise's cases ended up being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ExecutionMode {
    Composed,
    Sequential { reason: String },
}

/// Why the fused run was abandoned.
#[derive(Debug, Error)]
pub enum FallbackReason {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Run(#[from] RunFailure),
}

/// Files consulted ahead of a query, shared by every case of an exercise.
#[derive(Debug, Clone, Copy)]
struct Prelude<'t> {
    abolish: &'t [String],
    has_pre: bool,
    has_database: bool,
}

impl<'t> Prelude<'t> {
    fn of(test: &'t Test) -> Self {
        Self {
            abolish: &test.abolish,
            has_pre: test.has_pre(),
            has_database: test.has_database(),
        }
    }

    fn goal(&self, query_file: &str) -> String {
        build_goal(query_file, self.abolish, self.has_pre, self.has_database)
    }
}

/// Runs exercises for the submission whose knowledge is in the scratch
/// directory.
pub struct Grader<'a, E: Evaluator> {
    synthesizer: Synthesizer<'a>,
    evaluator: &'a E,
    scratch: &'a Scratch,
    timeout: Duration,
}

impl<'a, E: Evaluator> Grader<'a, E> {
    pub fn new(templates: &'a TemplateRegistry, evaluator: &'a E, scratch: &'a Scratch, timeout: Duration) -> Self {
        Self {
            synthesizer: Synthesizer::new(templates),
            evaluator,
            scratch,
            timeout,
        }
    }

    /// Load the knowledge alone. Returns a diagnostic if it does not load
    /// cleanly.
    pub fn check_knowledge(&self) -> GradeResult<Option<String>> {
        let raw = self
            .evaluator
            .evaluate(&check_goal(), Purpose::KnowledgeCheck, self.scratch.path())?;

        if raw.timed_out {
            return Ok(Some(RunFailure::TimedOut(self.timeout).to_string()));
        }
        if raw.stderr.contains(ERROR_LINE_MARKER) {
            return Ok(Some(error_diagnostic(&raw.stderr)));
        }
        Ok(None)
    }

    /// Reset and evaluate every case of `test`.
    ///
    /// The exercise's pre-knowledge and database must already be in the
    /// scratch directory.
    pub fn grade(&self, test: &mut Test) -> GradeResult<ExecutionMode> {
        test.reset();

        match self.run_composed(test)? {
            Ok(()) => {
                info!("  Composed test executed successfully");
                Ok(ExecutionMode::Composed)
            }
            Err(reason) => {
                info!("  Composed test failed ({}), running single tests instead", reason);
                self.run_sequential(test)?;
                Ok(ExecutionMode::Sequential {
                    reason: reason.to_string(),
                })
            }
        }
    }

    /// One evaluator invocation for all cases. Cases are only touched when
    /// every record could be attributed.
    fn run_composed(&self, test: &mut Test) -> GradeResult<Result<(), FallbackReason>> {
        let query = match self.synthesizer.synthesize_composed(test.cases()) {
            Ok(query) => query,
            Err(e) => return Ok(Err(e.into())),
        };
        self.scratch.write_query(COMPOSED_FILE, &query)?;

        let goal = Prelude::of(test).goal(COMPOSED_FILE);
        let raw = self.evaluator.evaluate(&goal, Purpose::Test, self.scratch.path())?;

        let records = match decode_composed(&raw, test.case_count(), self.timeout) {
            Ok(records) => records,
            Err(failure) => {
                log_errors(&raw);
                return Ok(Err(failure.into()));
            }
        };

        for (case, record) in test.cases_mut().zip(records) {
            case.record(record.values, record.outcome);
        }
        Ok(Ok(()))
    }

    fn run_sequential(&self, test: &mut Test) -> GradeResult<()> {
        let Test {
            groups,
            abolish,
            pre,
            database,
        } = test;
        let prelude = Prelude {
            abolish: abolish.as_slice(),
            has_pre: !pre.is_empty(),
            has_database: !database.is_empty(),
        };

        for case in groups.iter_mut().flat_map(|g| g.cases.iter_mut()) {
            if self.run_single(case, prelude)? {
                info!("  Test {} executed successfully", case.name);
            } else {
                warn!("  Test {} failed to execute", case.name);
            }
        }
        Ok(())
    }

    /// Evaluate one case. Returns false if it had to be recorded as an error.
    fn run_single(&self, case: &mut TestCase, prelude: Prelude<'_>) -> GradeResult<bool> {
        let query = match self.synthesizer.synthesize(case) {
            Ok(query) => query,
            Err(e) => {
                error!("  Test file creation failed for {}: {}", case.name, e);
                case.record_error(format!("ERROR, test file creation failed: {}", e));
                return Ok(false);
            }
        };
        let file = query_file(&case.test_type);
        self.scratch.write_query(&file, &query)?;

        let raw = self
            .evaluator
            .evaluate(&prelude.goal(&file), Purpose::Test, self.scratch.path())?;

        match decode_single(&raw, self.timeout) {
            Ok(record) => {
                debug!("  {} -> {}", case.name, record.outcome);
                case.record(record.values, record.outcome);
                Ok(true)
            }
            Err(failure) => {
                log_errors(&raw);
                let report = match failure {
                    RunFailure::Evaluator { diagnostic } => diagnostic,
                    other => other.to_string(),
                };
                case.record_error(format!("Evaluator error report: {}", report));
                Ok(false)
            }
        }
    }
}

fn log_errors(raw: &RawOutput) {
    for line in raw.stderr.lines().filter(|l| l.contains(ERROR_LINE_MARKER)) {
        warn!("    {}", line.trim());
    }
}
