#![allow(clippy::float_cmp)]

//! # docdeid-tasks
//!
//! Task runner for the docdeid development workflow.
//!
//! Each task wraps an external tool (black, isort, docformatter, flake8,
//! pylint, mypy, pytest, sphinx) with arguments derived from two inputs:
//! the mode (`CHECK`) and the maximum line length (`MAX_LINE_LENGTH`).
//!
//! - **Fix mode** (default): formatters rewrite files, lint tools never fail.
//! - **Check mode** (`CHECK=1`): formatters only verify, lint tools enforce
//!   their score thresholds.
//!
//! ## Quick Start
//!
//! ```bash
//! # Format and lint locally
//! docdeid-tasks run format lint
//!
//! # What CI runs
//! docdeid-tasks run format lint test CHECK=1
//!
//! # Show the commands without running them
//! docdeid-tasks plan lint MAX_LINE_LENGTH=100
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]

pub mod core;
pub mod error;
pub mod pipeline;
pub mod tasks;

// Re-export commonly used types
pub use crate::core::{Command, Config, Executor, Mode, Overrides, Runner, Settings, ToolArgs};
pub use error::{TaskError, TaskResult};
pub use pipeline::{Pipeline, PipelineResult, Step, StepAction, StepStatus};
pub use tasks::{Invocation, Task};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "docdeid-tasks";
