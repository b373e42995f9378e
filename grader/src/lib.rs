//! plgrade Grader
//!
//! Drives a full grading run: discovers exercises and submissions, checks
//! that each submission's knowledge loads, runs every exercise against it
//! and writes one report per exercise into the submission folder.
//!
//! - `discovery`: exercises, submissions and submitter names
//! - `workspace`: the scratch directory the evaluator works in
//! - `runner`: composed execution with a sequential fallback
//! - `report`: report files and the run summary

mod config;
mod discovery;
mod error;
mod report;
mod runner;
mod workspace;

pub use config::{GraderConfig, NamingScheme};
pub use discovery::{
    load_assignments, load_exercises, parse_abolish, strip_comments, submitter_name, Exercise,
    INVALID_FOLDER_NAME,
};
pub use error::{GradeError, GradeResult};
pub use report::{
    clear_reports, render_report, report_file_name, write_report, ExerciseSummary, GroupScore,
    RunSummary, SkippedSubmission, SubmissionSummary,
};
pub use runner::{ExecutionMode, FallbackReason, Grader};
pub use workspace::Scratch;

use plgrade_evaluator::Evaluator;
use plgrade_registry::TemplateRegistry;
use tracing::{info, warn};

/// Grade every submission against every exercise.
///
/// Submissions whose knowledge does not load are skipped. Evaluator problems
/// while running cases are recorded on those cases. Only configuration,
/// filesystem and evaluator start-up failures end the run early.
pub fn run<E: Evaluator>(config: &GraderConfig, evaluator: &E) -> GradeResult<RunSummary> {
    let templates = TemplateRegistry::load_from_dir(&config.templates_dir)?;
    let mut exercises = load_exercises(&config.tests_dir)?;
    let assignments = load_assignments(&config.assignments_dir, config.naming)?;
    info!(
        "Grading {} submissions against {} exercises",
        assignments.len(),
        exercises.len()
    );

    let scratch = Scratch::create(config.scratch_dir.as_deref())?;
    let grader = Grader::new(&templates, evaluator, &scratch, config.evaluator.timeout);
    let mut summary = RunSummary::default();

    for assignment in &assignments {
        info!("Processing submission {}", assignment.name);
        scratch.write_knowledge(&assignment.knowledge)?;

        if let Some(diagnostic) = grader.check_knowledge()? {
            warn!("Knowledge of {} does not load, skipping: {}", assignment.name, diagnostic);
            summary.skipped.push(SkippedSubmission {
                submitter: assignment.name.clone(),
                reason: diagnostic,
            });
            continue;
        }

        clear_reports(&assignment.path)?;

        let mut graded = SubmissionSummary {
            submitter: assignment.name.clone(),
            path: assignment.path.clone(),
            exercises: Vec::with_capacity(exercises.len()),
        };
        for exercise in &mut exercises {
            info!("Running exercise {} for {}", exercise.name, assignment.name);
            scratch.write_exercise(&exercise.test)?;

            let execution = grader.grade(&mut exercise.test)?;
            write_report(&assignment.path, &exercise.name, &exercise.test)?;

            let result = ExerciseSummary::new(exercise.name.as_str(), &exercise.test, execution);
            info!(
                "Exercise {} for {}: {}",
                exercise.name,
                assignment.name,
                if result.passing { "pass" } else { "fail" }
            );
            graded.exercises.push(result);
        }
        summary.graded.push(graded);
    }

    if config.scratch_dir.is_some() {
        scratch.clean()?;
    }
    if let Some(path) = &config.summary_path {
        summary.write_json(path)?;
        info!("Wrote run summary to {}", path.display());
    }

    info!(
        "Graded {} submissions ({} skipped): {} exercises passed, {} failed, {} needed the sequential fallback",
        summary.graded.len(),
        summary.skipped.len(),
        summary.exercises_passed(),
        summary.exercises_failed(),
        summary.fallbacks()
    );
    Ok(summary)
}
