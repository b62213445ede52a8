//! Command execution module.
//!
//! Spawns external tools directly (no shell) and reports their exit status.

use std::io::{self, ErrorKind};
use std::process::{Command as ProcessCommand, Stdio};
use std::time::{Duration, Instant};

use super::Command;
use crate::error::{TaskError, TaskResult};

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,

    /// Whether the process exited successfully
    pub success: bool,

    /// Standard output (if captured)
    pub stdout: Option<String>,

    /// Standard error (if captured)
    pub stderr: Option<String>,

    /// Time taken to execute
    pub duration: Duration,
}

impl ExecutionResult {
    /// Result for a process that exited with `code`.
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code), success: code == 0, stdout: None, stderr: None, duration: Duration::ZERO }
    }

    /// Check if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.success
    }

    /// Get the exit code.
    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

/// Something that can run a [`Command`] to completion.
pub trait Runner {
    /// Run the command and wait for it to exit.
    fn run(&self, command: &Command) -> TaskResult<ExecutionResult>;
}

impl<R: Runner + ?Sized> Runner for &R {
    fn run(&self, command: &Command) -> TaskResult<ExecutionResult> {
        (**self).run(command)
    }
}

/// Process-backed command executor.
#[derive(Debug, Default)]
pub struct Executor {
    /// Whether to capture output (vs pass through to terminal)
    pub capture_output: bool,
}

impl Executor {
    /// Create a new executor.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn capture(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// Execute a command.
    ///
    /// By default stdin/stdout/stderr are inherited so tool output streams
    /// straight to the terminal; set `capture_output` to collect it instead.
    ///
    /// A spawn failing with `NotFound` means the program is missing, unless
    /// the working directory itself is gone; that is reported as an I/O error.
    pub fn execute(&self, command: &Command) -> TaskResult<ExecutionResult> {
        let start = Instant::now();

        let mut cmd = ProcessCommand::new(&command.program);
        cmd.args(&command.args);

        if let Some(ref dir) = command.working_dir {
            cmd.current_dir(dir);
        }

        if self.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
            cmd.stdin(Stdio::inherit());
        }

        tracing::debug!(program = %command.program, args = ?command.args, "Spawning");

        let output = cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound if !command.dir().is_dir() => TaskError::Io(io::Error::new(
                ErrorKind::NotFound,
                format!("working directory '{}' does not exist", command.dir().display()),
            )),
            ErrorKind::NotFound => TaskError::ToolNotFound(command.program.clone()),
            _ => TaskError::Io(e),
        })?;

        let duration = start.elapsed();

        let (stdout, stderr) = if self.capture_output {
            (
                Some(String::from_utf8_lossy(&output.stdout).to_string()),
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            )
        } else {
            (None, None)
        };

        Ok(ExecutionResult {
            code: output.status.code(),
            success: output.status.success(),
            stdout,
            stderr,
            duration,
        })
    }
}

impl Runner for Executor {
    fn run(&self, command: &Command) -> TaskResult<ExecutionResult> {
        self.execute(command)
    }
}
