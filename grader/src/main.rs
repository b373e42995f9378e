//! plgrade command line
//!
//! Usage:
//!   plgrade [OPTIONS]
//!
//! Examples:
//!   # Grade ./assignments against ./tests with the default layout
//!   plgrade
//!
//!   # Blackboard folder names, a slower machine, and a JSON summary
//!   plgrade --naming blackboard --timeout-secs 60 --summary run.json

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use plgrade_evaluator::{EvaluatorConfig, SwiProlog};
use plgrade_grader::{GraderConfig, NamingScheme, RunSummary};

/// Automated grader for Prolog coursework
#[derive(Parser, Debug)]
#[command(name = "plgrade", version)]
#[command(about = "Run instructor test suites against student knowledge bases")]
struct Args {
    /// Directory with one subdirectory per exercise
    #[arg(long, default_value = "tests")]
    tests: PathBuf,

    /// Directory with one template file per test type
    #[arg(long, default_value = "test_templates")]
    templates: PathBuf,

    /// Directory with one subdirectory per submission
    #[arg(long, default_value = "assignments")]
    assignments: PathBuf,

    /// How submitter names are read from folder names (brightspace, blackboard)
    #[arg(long, default_value = "brightspace")]
    naming: NamingScheme,

    /// Evaluator executable
    #[arg(long, env = "PLGRADE_EVALUATOR", default_value = "swipl")]
    evaluator: String,

    /// Global stack bound for test runs
    #[arg(long, default_value = "128k")]
    stack_limit: String,

    /// Global stack bound for the knowledge check
    #[arg(long, default_value = "1m")]
    check_stack_limit: String,

    /// Seconds before an evaluator run is killed
    #[arg(long, env = "PLGRADE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Keep scratch files in this directory instead of a temporary one
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Write a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> GraderConfig {
        let evaluator = EvaluatorConfig::new()
            .with_program(self.evaluator)
            .with_stack_limit(self.stack_limit)
            .with_check_stack_limit(self.check_stack_limit)
            .with_timeout(Duration::from_secs(self.timeout_secs));

        let mut config = GraderConfig::new()
            .with_tests_dir(self.tests)
            .with_templates_dir(self.templates)
            .with_assignments_dir(self.assignments)
            .with_naming(self.naming)
            .with_evaluator(evaluator);
        if let Some(dir) = self.scratch_dir {
            config = config.with_scratch_dir(dir);
        }
        if let Some(path) = self.summary {
            config = config.with_summary_path(path);
        }
        config
    }
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = args.into_config();
    let evaluator = SwiProlog::new(config.evaluator.clone());

    match plgrade_grader::run(&config, &evaluator) {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            eprintln!("{} {}", "ERROR:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "GRADING SUMMARY".cyan().bold());
    for submission in &summary.graded {
        let passed = submission.exercises.iter().filter(|e| e.passing).count();
        println!(
            "  {:<30} {}/{} exercises passed",
            submission.submitter,
            passed,
            submission.exercises.len()
        );
    }
    for skipped in &summary.skipped {
        println!("  {:<30} {}", skipped.submitter, "SKIPPED".yellow());
    }
    println!(
        "{} {}  {} {}",
        "Passed:".green().bold(),
        summary.exercises_passed(),
        "Failed:".red().bold(),
        summary.exercises_failed()
    );
}
