//! Scripted evaluator for grading tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use plgrade_core::TestGroup;
use plgrade_evaluator::{Evaluator, EvaluatorResult, Purpose, RawOutput};
use plgrade_registry::TemplateRegistry;

pub const UNIFY: &str =
    "(<GOAL> -> (<EXPECTED> -> <WRITEVAR>,writeln(pass) ; <WRITEVAR>,writeln(fail)) ; writeln(fail))";

/// One evaluator invocation as seen by the fake.
#[derive(Debug, Clone)]
pub struct Call {
    pub goal: String,
    pub purpose: Purpose,
    /// Contents of the last file consulted by the goal.
    pub query: String,
}

impl Call {
    pub fn is_composed(&self) -> bool {
        self.goal.contains("consult(\"composed.temp\")")
    }
}

/// Evaluator that answers from a closure and records every call.
pub struct FakeEvaluator {
    respond: Box<dyn Fn(&Call) -> RawOutput>,
    calls: RefCell<Vec<Call>>,
}

impl FakeEvaluator {
    pub fn new(respond: impl Fn(&Call) -> RawOutput + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn test_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.purpose == Purpose::Test)
            .collect()
    }
}

impl Evaluator for FakeEvaluator {
    fn evaluate(&self, goal: &str, purpose: Purpose, workdir: &Path) -> EvaluatorResult<RawOutput> {
        let file = goal
            .rsplit("consult(\"")
            .next()
            .and_then(|rest| rest.split('"').next())
            .unwrap_or_default();
        let call = Call {
            goal: goal.to_string(),
            purpose,
            query: fs::read_to_string(workdir.join(file)).unwrap_or_default(),
        };
        let out = (self.respond)(&call);
        self.calls.borrow_mut().push(call);
        Ok(out)
    }
}

/// Answers a single-case run from `(goal fragment, output)` pairs.
pub fn single_answer(call: &Call, answers: &[(&str, &str)]) -> RawOutput {
    answers
        .iter()
        .find(|(needle, _)| call.query.contains(needle))
        .map(|(_, out)| RawOutput::new(*out, ""))
        .unwrap_or_else(|| RawOutput::new("", "ERROR: unexpected query"))
}

pub fn templates() -> TemplateRegistry {
    TemplateRegistry::new().with("unify", UNIFY)
}

pub fn groups(source: &str) -> Vec<TestGroup> {
    plgrade_parser::parse_tests(source).unwrap()
}
