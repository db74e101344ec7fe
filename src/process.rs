//! External process execution
//!
//! Everything that shells out (the web UI launcher, the publisher, git
//! queries, doctor probes) goes through [`CommandRunner`], so a dry run or
//! a test can substitute [`RecordingRunner`] and inspect the command
//! sequence without touching the system.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

/// Exit code and captured output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

pub trait CommandRunner {
    /// Resolve `program` on PATH.
    fn which(&self, program: &str) -> Option<PathBuf>;

    /// Run with inherited stdio and return the exit code.
    fn run(&self, program: &str, args: &[&str]) -> Result<i32>;

    /// Run with captured output.
    fn capture(&self, program: &str, args: &[&str]) -> Result<Captured>;

    /// True when the command exits 0. Output is discarded.
    fn probe(&self, program: &str, args: &[&str]) -> Result<bool> {
        Ok(self.capture(program, args)?.success())
    }
}

/// Display form of a command line, used in logs and dry runs.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .map(|part| {
            if part.is_empty() || part.contains(char::is_whitespace) {
                format!("\"{}\"", part)
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<i32> {
        debug!(command = %command_line(program, args), "running");
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to run {}", program))?;
        // killed by a signal
        Ok(status.code().unwrap_or(1))
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<Captured> {
        debug!(command = %command_line(program, args), "capturing");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {}", program))?;
        Ok(Captured {
            code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Records every command instead of running it.
///
/// Programs are found by `which` only when listed as available. Commands
/// exit 0 unless a failure code was registered for their exact command
/// line. With `echo` set, each command is printed as it would run.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    available: HashSet<String>,
    failures: HashMap<String, i32>,
    outputs: HashMap<String, String>,
    echo: bool,
    calls: RefCell<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything on PATH, every command succeeds, commands are printed.
    pub fn dry_run(programs: &[&str]) -> Self {
        let mut runner = Self::new().echo(true);
        for program in programs {
            runner = runner.with_program(program);
        }
        runner
    }

    pub fn with_program(mut self, program: &str) -> Self {
        self.available.insert(program.to_string());
        self
    }

    /// Make `command_line` exit with `code`.
    pub fn failing(mut self, command_line: &str, code: i32) -> Self {
        self.failures.insert(command_line.to_string(), code);
        self
    }

    /// Captured stdout for `command_line`.
    pub fn with_output(mut self, command_line: &str, stdout: &str) -> Self {
        self.outputs
            .insert(command_line.to_string(), stdout.to_string());
        self
    }

    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> (String, i32) {
        let line = command_line(program, args);
        if self.echo {
            println!("[dry-run] {}", line);
        }
        self.calls.borrow_mut().push(line.clone());
        let code = self.failures.get(&line).copied().unwrap_or(0);
        (line, code)
    }
}

impl CommandRunner for RecordingRunner {
    fn which(&self, program: &str) -> Option<PathBuf> {
        self.available
            .contains(program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<i32> {
        Ok(self.record(program, args).1)
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<Captured> {
        let (line, code) = self.record(program, args);
        Ok(Captured {
            code,
            stdout: self.outputs.get(&line).cloned().unwrap_or_default(),
            stderr: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_quotes_spaces() {
        assert_eq!(
            command_line("git", &["commit", "-m", "Initial commit"]),
            "git commit -m \"Initial commit\""
        );
        assert_eq!(command_line("git", &["add", "."]), "git add .");
    }

    #[test]
    fn test_recording_runner_defaults() {
        let runner = RecordingRunner::new().with_program("git");
        assert!(runner.which("git").is_some());
        assert!(runner.which("python3").is_none());
        assert_eq!(runner.run("git", &["status"]).unwrap(), 0);
        assert_eq!(runner.calls(), vec!["git status"]);
    }

    #[test]
    fn test_recording_runner_failures_and_output() {
        let runner = RecordingRunner::new()
            .failing("git push -u origin main", 128)
            .with_output("git branch --show-current", "main\n");
        assert_eq!(runner.run("git", &["push", "-u", "origin", "main"]).unwrap(), 128);
        let captured = runner.capture("git", &["branch", "--show-current"]).unwrap();
        assert!(captured.success());
        assert_eq!(captured.stdout, "main\n");
        assert!(!runner.probe("git", &["push", "-u", "origin", "main"]).unwrap());
    }

    #[test]
    fn test_system_runner_finds_missing_program() {
        assert!(SystemRunner
            .which("definitely-not-a-real-program-ballroll")
            .is_none());
    }
}
