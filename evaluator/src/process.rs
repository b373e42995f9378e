//! Evaluator subprocess handling.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::{EvaluatorConfig, EvaluatorError, EvaluatorResult};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured output of one evaluator invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    /// Set when the wall-clock bound killed the process.
    pub timed_out: bool,
}

impl RawOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: Some(0),
            timed_out: false,
        }
    }
}

/// Why the evaluator is being started; selects the stack bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Load the candidate knowledge alone.
    KnowledgeCheck,
    /// Run a synthesized query.
    Test,
}

/// Something that can run a start goal inside a scratch directory.
pub trait Evaluator {
    fn evaluate(&self, goal: &str, purpose: Purpose, workdir: &Path) -> EvaluatorResult<RawOutput>;
}

/// SWI-Prolog command-line evaluator.
#[derive(Debug, Clone, Default)]
pub struct SwiProlog {
    config: EvaluatorConfig,
}

impl SwiProlog {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Build the command line: bounded global stack, quiet mode, the start
    /// goal, and an unconditional `halt` so the process always ends.
    pub fn command(&self, goal: &str, purpose: Purpose, workdir: &Path) -> Command {
        let limit = match purpose {
            Purpose::KnowledgeCheck => &self.config.check_stack_limit,
            Purpose::Test => &self.config.stack_limit,
        };

        let mut cmd = Command::new(&self.config.program);
        cmd.arg(format!("-G{}", limit))
            .arg("-q")
            .arg("-g")
            .arg(goal)
            .arg("-t")
            .arg("halt")
            .current_dir(workdir);
        cmd
    }
}

impl Evaluator for SwiProlog {
    fn evaluate(&self, goal: &str, purpose: Purpose, workdir: &Path) -> EvaluatorResult<RawOutput> {
        debug!("Evaluating {:?} goal: {}", purpose, goal);
        run_process(self.command(goal, purpose, workdir), self.config.timeout)
    }
}

/// Kills and reaps the child on every exit path.
struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

/// Run `command` to completion, capturing stdout and stderr, killing it once
/// `timeout` has elapsed. Output is decoded lossily.
pub fn run_process(mut command: Command, timeout: Duration) -> EvaluatorResult<RawOutput> {
    let program = command.get_program().to_string_lossy().into_owned();
    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| EvaluatorError::Spawn {
            program: program.clone(),
            source,
        })?;
    let mut child = ChildGuard(child);

    // Drain both pipes concurrently so a chatty evaluator cannot block on a
    // full pipe while we poll for its exit.
    let stdout = child.0.stdout.take().map(drain);
    let stderr = child.0.stderr.take().map(drain);

    let started_at = Instant::now();
    let (exit_code, timed_out) = loop {
        match child.0.try_wait().map_err(EvaluatorError::Wait)? {
            Some(status) => break (status.code(), false),
            None if started_at.elapsed() >= timeout => {
                warn!("Evaluator '{}' exceeded {:?}, killing it", program, timeout);
                let _ = child.0.kill();
                let status = child.0.wait().map_err(EvaluatorError::Wait)?;
                break (status.code(), true);
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };
    drop(child);

    Ok(RawOutput {
        stdout: collect(stdout),
        stderr: collect(stderr),
        exit_code,
        timed_out,
    })
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipl_command_line() {
        let swipl = SwiProlog::new(EvaluatorConfig::new().with_stack_limit("256k"));
        let workdir = Path::new("/tmp/scratch");

        let cmd = swipl.command("consult(\"knowledge.temp\"),go", Purpose::Test, workdir);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(cmd.get_program(), "swipl");
        assert_eq!(args, vec!["-G256k", "-q", "-g", "consult(\"knowledge.temp\"),go", "-t", "halt"]);
        assert_eq!(cmd.get_current_dir(), Some(workdir));

        let check = swipl.command("true", Purpose::KnowledgeCheck, workdir);
        assert_eq!(check.get_args().next().unwrap(), "-G1m");
    }

    #[test]
    fn test_spawn_failure() {
        let err = run_process(
            Command::new("plgrade-definitely-not-installed"),
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, EvaluatorError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_and_stderr() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("printf 'X=5|:|pass'; echo 'ERROR: boom' >&2");

        let out = run_process(cmd, Duration::from_secs(10)).unwrap();

        assert_eq!(out.stdout, "X=5|:|pass");
        assert_eq!(out.stderr.trim(), "ERROR: boom");
        assert_eq!(out.exit_code, Some(0));
        assert!(!out.timed_out);
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_process() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");

        let started = Instant::now();
        let out = run_process(cmd, Duration::from_millis(200)).unwrap();

        assert!(out.timed_out);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
