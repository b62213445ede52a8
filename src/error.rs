//! Error types for task resolution and execution.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for task operations.
pub type TaskResult<T> = Result<T, TaskError>;

/// Errors raised by the runner itself.
///
/// A tool exiting non-zero is not an error here; it is reported through
/// the pipeline result so its exit code can be passed on unchanged.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Task name not in the catalogue.
    #[error("Unknown task '{name}'. Available tasks: {available}")]
    UnknownTask { name: String, available: String },

    /// Only variable assignments were given.
    #[error("No tasks given")]
    NoTasks,

    /// A value could not be parsed for the named variable.
    #[error("Invalid value '{value}' for {variable}: {reason}")]
    InvalidValue { variable: String, value: String, reason: String },

    /// `KEY=VALUE` operand naming a variable the runner does not know.
    #[error("Unknown variable '{0}'. Supported: CHECK, MAX_LINE_LENGTH")]
    InvalidOverride(String),

    /// Config file could not be read or parsed.
    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// External program is not installed or not on PATH.
    #[error("Tool not found: '{0}' (is it installed and on PATH?)")]
    ToolNotFound(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
