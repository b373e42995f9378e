//! Decoding of evaluator output.
//!
//! A record looks like `Var1=Val1|:|Var2=Val2|:|pass|:|`. Fused runs print one
//! record per case, each followed by the case terminator.

use plgrade_core::{Outcome, CASE_TERMINATOR, ERROR_LINE_MARKER, ERROR_MARKER, FIELD_SEPARATOR};

use crate::{RawOutput, RunFailure};

const TERMINATOR_PIPES: usize = CASE_TERMINATOR.len();

/// The values and verdict printed for one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// `Var=Value` strings, in print order.
    pub values: Vec<String>,
    pub outcome: Outcome,
}

impl Record {
    /// Decode one record. An empty field after a trailing separator is
    /// discarded; the last field is the verdict only if it is a verdict
    /// token, otherwise every field is a value.
    pub fn parse(text: &str) -> Self {
        let mut fields: Vec<&str> = text.trim().split(FIELD_SEPARATOR).map(str::trim).collect();
        if fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }

        let outcome = fields.last().map_or(Outcome::Unknown, |f| Outcome::from_token(f));
        if outcome != Outcome::Unknown {
            fields.pop();
        }
        Self {
            values: fields.into_iter().map(str::to_string).collect(),
            outcome,
        }
    }

    /// The values split into `(Var, Value)` at the first `=`.
    pub fn bindings(&self) -> Vec<(&str, &str)> {
        self.values
            .iter()
            .map(|v| v.split_once('=').unwrap_or((v.as_str(), "")))
            .collect()
    }
}

/// Split fused output into per-case record strings.
///
/// Within a run of pipes the terminator is the last four, so a record that
/// ends with a field separator directly before the terminator stays intact.
/// Only terminated segments are records: whatever follows the final
/// terminator belongs to a case that never finished and is dropped.
pub fn split_cases(stdout: &str) -> Vec<&str> {
    let bytes = stdout.as_bytes();
    let mut records = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'|' {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < bytes.len() && bytes[i] == b'|' {
            i += 1;
        }
        if i - run_start >= TERMINATOR_PIPES {
            records.push(&stdout[start..i - TERMINATOR_PIPES]);
            start = i;
        }
    }
    records
}

/// True if stderr carries the fatal error marker.
pub fn has_error(stderr: &str) -> bool {
    stderr.contains(ERROR_MARKER)
}

/// The stderr lines mentioning an error, trimmed and joined by spaces.
pub fn error_diagnostic(stderr: &str) -> String {
    stderr
        .lines()
        .filter(|line| line.contains(ERROR_LINE_MARKER))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

fn classify(raw: &RawOutput, timeout: std::time::Duration) -> Result<(), RunFailure> {
    if raw.timed_out {
        return Err(RunFailure::TimedOut(timeout));
    }
    if has_error(&raw.stderr) {
        return Err(RunFailure::Evaluator {
            diagnostic: error_diagnostic(&raw.stderr),
        });
    }
    Ok(())
}

/// Decode the output of a single-case run.
pub fn decode_single(raw: &RawOutput, timeout: std::time::Duration) -> Result<Record, RunFailure> {
    classify(raw, timeout)?;
    Ok(Record::parse(&raw.stdout))
}

/// Decode the output of a fused run of `expected` cases.
///
/// Any evaluator error, or a record count that differs from `expected`,
/// means the output cannot be attributed to cases safely.
pub fn decode_composed(
    raw: &RawOutput,
    expected: usize,
    timeout: std::time::Duration,
) -> Result<Vec<Record>, RunFailure> {
    classify(raw, timeout)?;

    let records: Vec<Record> = split_cases(&raw.stdout).into_iter().map(Record::parse).collect();
    if records.len() != expected {
        return Err(RunFailure::Malformed {
            expected,
            found: records.len(),
        });
    }
    Ok(records)
}
