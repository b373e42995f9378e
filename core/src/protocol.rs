//! Protocol constants shared between query synthesis and output parsing.
//!
//! The synthesized queries make the evaluator print records in a fixed shape;
//! these constants keep both sides of that contract in one place.

/// Auxiliary output channel: an expected entry not bound to a goal variable.
pub const RESULT_VAR: &str = "Result";

/// Separator written after every `Var=Value` pair and after the verdict token.
pub const FIELD_SEPARATOR: &str = "|:|";

/// Terminator written after each test case's record in a fused query.
pub const CASE_TERMINATOR: &str = "||||";

/// Substring of evaluator stderr that marks a fatal evaluation fault.
pub const ERROR_MARKER: &str = "ERROR:";

/// Looser marker used when surfacing diagnostic lines and checking knowledge.
pub const ERROR_LINE_MARKER: &str = "ERROR";

/// Template placeholder for the goal expression.
pub const GOAL_PLACEHOLDER: &str = "<GOAL>";

/// Template placeholder for the expected-value unifications.
pub const EXPECTED_PLACEHOLDER: &str = "<EXPECTED>";

/// Template placeholder for the output instructions.
pub const WRITEVAR_PLACEHOLDER: &str = "<WRITEVAR>";

/// Verdict token printed by templates for a passing case.
pub const PASS_TOKEN: &str = "pass";

/// Verdict token printed by templates for a failing case.
pub const FAIL_TOKEN: &str = "fail";

/// Name of the directive every synthesized query defines.
pub const ENTRY_DIRECTIVE: &str = "go";
