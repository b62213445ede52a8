//! Core types and functionality.
//!
//! This module contains the fundamental data structures used throughout
//! the runner: commands, configuration, resolved settings, tool argument
//! resolution, and process execution.

mod command;
mod config;
mod executor;
mod resolver;
mod settings;

pub use command::Command;
pub use config::{
    detect_package_name, CleanConfig, Config, GeneralConfig, PathsConfig, Thresholds,
    CONFIG_FILE_NAME, DEFAULT_MAX_LINE_LENGTH, DEFAULT_PACKAGE,
};
pub use executor::{ExecutionResult, Executor, Runner};
pub use resolver::{format_score, ToolArgs, DOCSTRING_MESSAGES, TYPE_HINT_CODES};
pub use settings::{parse_line_length, Mode, Overrides, Settings};
