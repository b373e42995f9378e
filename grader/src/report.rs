//! Report files and the run summary.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use plgrade_core::{Test, TestGroup};
use serde::Serialize;
use tracing::debug;

use crate::{ExecutionMode, GradeError, GradeResult};

const REPORT_EXTENSION: &str = "out";
const RULE_WIDTH: usize = 250;
const BANNER_WIDTH: usize = 115;
const GROUP_INDENT: &str = "  ";

/// Report file name: `+` or `-` followed by the exercise identifier.
pub fn report_file_name(exercise: &str, passing: bool) -> String {
    let prefix = if passing { '+' } else { '-' };
    format!("{}{}.{}", prefix, exercise, REPORT_EXTENSION)
}

/// Render the column-aligned report for one exercise.
pub fn render_report(test: &Test) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<40}{:<60}{:<15}{:<15}{:<80}{:<80}",
        "Name:", "Goal:", "Type:", "Pass/Fail:", "Expected:", "Result:"
    );
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    for group in &test.groups {
        render_group(&mut out, group);
    }
    out
}

fn render_group(out: &mut String, group: &TestGroup) {
    let indent = if group.is_optional() { GROUP_INDENT } else { "" };

    if group.is_optional() {
        let verdict = if group.is_passing() { "pass" } else { "fail" };
        let rule = "-".repeat(RULE_WIDTH);
        let _ = writeln!(out, "\n{}", rule);
        let _ = writeln!(
            out,
            "{:<width$}{}",
            format!("OPTIONAL GROUP: {}", group.name),
            verdict,
            width = BANNER_WIDTH
        );
        let _ = writeln!(out, "{}", rule);
    }

    for case in &group.cases {
        let _ = writeln!(
            out,
            "{:<40}{:<60}{:<15}{:<15}{:<80}{:<80}",
            format!("{}{}", indent, case.name),
            case.goal.text,
            case.test_type,
            case.success.as_str(),
            case.expected.to_string(),
            case.result.join(", ")
        );
    }

    if group.is_optional() {
        out.push('\n');
    }
}

/// Write the report for `exercise` into the submission folder. Returns its path.
pub fn write_report(submission: &Path, exercise: &str, test: &Test) -> GradeResult<PathBuf> {
    let path = submission.join(report_file_name(exercise, test.is_passing()));
    fs::write(&path, render_report(test)).map_err(GradeError::io(&path))?;
    debug!("Wrote report {}", path.display());
    Ok(path)
}

/// Remove reports left by an earlier run.
pub fn clear_reports(submission: &Path) -> GradeResult<()> {
    for entry in fs::read_dir(submission).map_err(GradeError::io(submission))? {
        let path = entry.map_err(GradeError::io(submission))?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == REPORT_EXTENSION) {
            debug!("Removing stale report {}", path.display());
            fs::remove_file(&path).map_err(GradeError::io(&path))?;
        }
    }
    Ok(())
}

/// Passing cases per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupScore {
    pub group: String,
    pub score: usize,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseSummary {
    pub exercise: String,
    pub passing: bool,
    pub execution: ExecutionMode,
    pub groups: Vec<GroupScore>,
}

impl ExerciseSummary {
    pub fn new(exercise: impl Into<String>, test: &Test, execution: ExecutionMode) -> Self {
        Self {
            exercise: exercise.into(),
            passing: test.is_passing(),
            execution,
            groups: test
                .groups
                .iter()
                .map(|g| GroupScore {
                    group: g.name.clone(),
                    score: g.score(),
                    size: g.cases.len(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionSummary {
    pub submitter: String,
    pub path: PathBuf,
    pub exercises: Vec<ExerciseSummary>,
}

/// A submission that was not graded, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSubmission {
    pub submitter: String,
    pub reason: String,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub graded: Vec<SubmissionSummary>,
    pub skipped: Vec<SkippedSubmission>,
}

impl RunSummary {
    pub fn exercises_passed(&self) -> usize {
        self.exercises().filter(|e| e.passing).count()
    }

    pub fn exercises_failed(&self) -> usize {
        self.exercises().filter(|e| !e.passing).count()
    }

    /// Exercises that needed the sequential fallback.
    pub fn fallbacks(&self) -> usize {
        self.exercises()
            .filter(|e| matches!(e.execution, ExecutionMode::Sequential { .. }))
            .count()
    }

    fn exercises(&self) -> impl Iterator<Item = &ExerciseSummary> {
        self.graded.iter().flat_map(|s| s.exercises.iter())
    }

    pub fn to_json(&self) -> GradeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> GradeResult<()> {
        fs::write(path, self.to_json()?).map_err(GradeError::io(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plgrade_core::{Expected, Goal, Outcome, TestCase};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn case(name: &str, outcome: Outcome) -> TestCase {
        let mut expected = Expected::new();
        expected.insert("X", "5");
        let mut case = TestCase::new(name, "unify", Goal::new("p(X)", vec!["X".into()]), expected);
        case.record(vec!["X=5".into()], outcome);
        case
    }

    fn sample() -> Test {
        let mut optional = TestGroup::new("either");
        optional.cases = vec![case("a", Outcome::Fail), case("b", Outcome::Pass)];
        let mut single = TestGroup::new("c");
        single.cases = vec![case("c", Outcome::Pass)];
        Test::new(vec![optional, single])
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("ex1", true), "+ex1.out");
        assert_eq!(report_file_name("ex1", false), "-ex1.out");
    }

    #[test]
    fn test_render_report() {
        let report = render_report(&sample());
        let lines: Vec<&str> = report.lines().collect();

        assert!(lines[0].starts_with("Name:"));
        assert_eq!(lines[0].len(), 290);
        assert_eq!(lines[1], "=".repeat(250));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "-".repeat(250));
        assert!(lines[4].starts_with("OPTIONAL GROUP: either"));
        assert!(lines[4].ends_with("pass"));
        assert_eq!(lines[4].len(), 119);
        assert!(lines[6].starts_with("  a"));
        assert_eq!(&lines[6][40..44], "p(X)");
        assert_eq!(&lines[6][100..105], "unify");
        assert_eq!(&lines[6][115..119], "fail");
        assert_eq!(&lines[6][130..133], "X=5");
        assert_eq!(lines[8], "");
        assert!(lines[9].starts_with("c "));
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_write_and_clear_reports() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("-ex1.out"), "stale").unwrap();
        fs::write(dir.path().join("main.pl"), "a.").unwrap();

        clear_reports(dir.path()).unwrap();
        assert!(!dir.path().join("-ex1.out").exists());

        let path = write_report(dir.path(), "ex1", &sample()).unwrap();
        assert_eq!(path, dir.path().join("+ex1.out"));
        assert!(dir.path().join("main.pl").exists());
    }

    #[test]
    fn test_summary_json() {
        let summary = RunSummary {
            graded: vec![SubmissionSummary {
                submitter: "group_1".into(),
                path: PathBuf::from("assignments/group_1"),
                exercises: vec![ExerciseSummary::new("ex1", &sample(), ExecutionMode::Composed)],
            }],
            skipped: vec![SkippedSubmission {
                submitter: "group_2".into(),
                reason: "syntax".into(),
            }],
        };

        assert_eq!(summary.exercises_passed(), 1);
        assert_eq!(summary.exercises_failed(), 0);
        assert_eq!(summary.fallbacks(), 0);

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["graded"][0]["exercises"][0]["execution"]["mode"], "composed");
        assert_eq!(json["graded"][0]["exercises"][0]["groups"][0]["score"], 1);
        assert_eq!(json["skipped"][0]["submitter"], "group_2");
    }
}
