//! Sequential step execution.
//!
//! A pipeline runs its steps one at a time. The first failing step halts
//! it: every later step is recorded as skipped and never started. Steps
//! marked with [`Step::allow_failure`] are the exception: a non-zero exit is
//! recorded as a warning and the pipeline carries on.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::core::{Command, Runner};
use crate::error::TaskResult;
use crate::tasks::Task;

/// What a step does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    /// Spawn an external tool
    Exec(Command),
    /// Remove files or directories, relative to the project root
    Remove(Vec<String>),
}

/// One leaf action of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Task this step belongs to
    pub task: Task,

    /// What to do
    pub action: StepAction,

    /// A non-zero exit is reported but does not halt the pipeline
    pub allow_failure: bool,
}

impl Step {
    /// Step that runs a command.
    pub fn exec(task: Task, command: Command) -> Self {
        Self { task, action: StepAction::Exec(command), allow_failure: false }
    }

    /// Step that removes paths.
    pub fn remove<I, S>(task: Task, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            task,
            action: StepAction::Remove(paths.into_iter().map(Into::into).collect()),
            allow_failure: false,
        }
    }

    /// Let the tool exit non-zero without halting the pipeline.
    ///
    /// Only the tool's exit status is tolerated; a step that cannot be
    /// carried out at all (missing tool, I/O error) still fails.
    #[must_use]
    pub fn allow_failure(mut self, allow: bool) -> Self {
        self.allow_failure = allow;
        self
    }

    /// The command, if this step spawns one.
    pub fn command(&self) -> Option<&Command> {
        match &self.action {
            StepAction::Exec(cmd) => Some(cmd),
            StepAction::Remove(_) => None,
        }
    }

    /// Human-readable description of the step.
    pub fn describe(&self) -> String {
        match &self.action {
            StepAction::Exec(cmd) => cmd.command_line(),
            StepAction::Remove(paths) => format!("remove {}", paths.join(" ")),
        }
    }
}

/// Status of a step after the pipeline ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StepStatus {
    /// Step completed successfully
    Success,
    /// Step failed with optional exit code
    Failed(Option<i32>),
    /// Tool exited non-zero, but the step allows failure
    Warned(Option<i32>),
    /// Step was not run because an earlier step failed or the run was interrupted
    Skipped,
    /// Step was only printed (dry run)
    Planned,
}

impl StepStatus {
    /// Check if the step was successful.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Check if the step failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Check if the step completed, possibly with warnings.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Success | Self::Warned(_))
    }
}

/// Result of a single step.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    /// The step that was (or was not) executed
    pub step: Step,
    /// Status of execution
    pub status: StepStatus,
    /// Runner error, when the step could not be carried out at all
    pub error: Option<String>,
    /// Duration of execution
    pub duration: Duration,
}

/// Result of running a whole pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Results for each step, in order
    pub steps: Vec<StepResult>,
    /// Total duration
    pub total_duration: Duration,
    /// Whether the run was stopped by an interrupt
    pub interrupted: bool,
}

impl PipelineResult {
    /// Whether every step completed (or was planned) and nothing was interrupted.
    pub fn success(&self) -> bool {
        !self.interrupted
            && self.steps.iter().all(|s| s.status.is_completed() || s.status == StepStatus::Planned)
    }

    /// The first failed step.
    pub fn first_failure(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.status.is_failure())
    }

    /// Get the number of successful steps.
    pub fn success_count(&self) -> usize {
        self.steps.iter().filter(|s| s.status.is_success()).count()
    }

    /// Steps whose tool exited non-zero without halting the run.
    pub fn warnings(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|s| matches!(s.status, StepStatus::Warned(_)))
    }

    /// Get the number of skipped steps.
    pub fn skipped_count(&self) -> usize {
        self.steps.iter().filter(|s| s.status == StepStatus::Skipped).count()
    }

    /// Exit code for the whole run.
    ///
    /// An interrupt gives 130, even when it also killed the running tool.
    /// Otherwise a failing tool's own exit code is passed through, and steps
    /// that failed without one (signal, missing tool, removal error) give 1.
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            return 130;
        }
        match self.first_failure().map(|f| &f.status) {
            Some(StepStatus::Failed(Some(code))) if *code != 0 => *code,
            Some(_) => 1,
            None => 0,
        }
    }
}

/// Sequential pipeline executor.
pub struct Pipeline<R> {
    runner: R,
    root: PathBuf,
    dry_run: bool,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<R: Runner> Pipeline<R> {
    /// Create a pipeline rooted at `root`.
    pub fn new(runner: R, root: impl Into<PathBuf>) -> Self {
        Self { runner, root: root.into(), dry_run: false, interrupt: None }
    }

    /// Only record the plan; spawn and remove nothing.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Flag checked before each step; once set, remaining steps are skipped.
    #[must_use]
    pub fn interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    #[cfg(test)]
    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }

    /// Run all steps.
    pub fn run(&self, steps: &[Step]) -> PipelineResult {
        self.run_with_progress(steps, |_, _, _| {})
    }

    /// Run all steps, calling `on_progress(index, total, step)` before each one starts.
    pub fn run_with_progress<F>(&self, steps: &[Step], mut on_progress: F) -> PipelineResult
    where
        F: FnMut(usize, usize, &Step),
    {
        let start = Instant::now();
        let mut results = Vec::with_capacity(steps.len());
        let mut halted = false;
        let mut interrupted = false;

        for (i, step) in steps.iter().enumerate() {
            if !halted && self.interrupted() {
                tracing::warn!(task = %step.task, "Interrupted, skipping remaining steps");
                halted = true;
                interrupted = true;
            }

            if halted {
                results.push(StepResult {
                    step: step.clone(),
                    status: StepStatus::Skipped,
                    error: None,
                    duration: Duration::ZERO,
                });
                continue;
            }

            on_progress(i, steps.len(), step);

            let result = if self.dry_run {
                StepResult {
                    step: step.clone(),
                    status: StepStatus::Planned,
                    error: None,
                    duration: Duration::ZERO,
                }
            } else {
                self.execute_step(step)
            };

            if result.status.is_failure() {
                tracing::debug!(task = %step.task, status = ?result.status, "Step failed, halting");
                halted = true;
            }
            results.push(result);
        }

        // Ctrl-C during the last (or a failing) step is never seen by the loop.
        let interrupted = interrupted || self.interrupted();

        PipelineResult { steps: results, total_duration: start.elapsed(), interrupted }
    }

    fn interrupted(&self) -> bool {
        self.interrupt.as_ref().is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Execute a single step.
    fn execute_step(&self, step: &Step) -> StepResult {
        let start = Instant::now();

        let outcome = match &step.action {
            StepAction::Exec(cmd) => {
                tracing::info!(task = %step.task, command = %cmd, "Running");
                self.runner.run(cmd).map(|r| {
                    if r.success() {
                        StepStatus::Success
                    } else if step.allow_failure {
                        tracing::warn!(task = %step.task, code = ?r.code(), "Tool reported problems, continuing");
                        StepStatus::Warned(r.code())
                    } else {
                        StepStatus::Failed(r.code())
                    }
                })
            }
            StepAction::Remove(paths) => {
                tracing::info!(task = %step.task, paths = ?paths, "Removing");
                remove_paths(&self.root, paths).map(|()| StepStatus::Success)
            }
        };

        let (status, error) = match outcome {
            Ok(status) => (status, None),
            Err(e) => {
                tracing::error!(task = %step.task, error = %e, "Step could not run");
                (StepStatus::Failed(None), Some(e.to_string()))
            }
        };

        StepResult { step: step.clone(), status, error, duration: start.elapsed() }
    }
}

/// Remove each path under `root`. Missing paths are not an error.
pub fn remove_paths(root: &Path, paths: &[String]) -> TaskResult<()> {
    for path in paths {
        let target = root.join(path);
        let removed = match std::fs::symlink_metadata(&target) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&target),
            Ok(_) => std::fs::remove_file(&target),
            Err(e) => Err(e),
        };

        match removed {
            Ok(()) => tracing::debug!(path = %target.display(), "Removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
