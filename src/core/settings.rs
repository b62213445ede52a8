//! Resolved per-invocation settings.
//!
//! Settings are layered: defaults, then the config file, then the
//! environment and global flags, then `KEY=VALUE` operands. The result is
//! immutable for the rest of the invocation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use super::config::{detect_package_name, Config, Thresholds, DEFAULT_PACKAGE};
use crate::error::{TaskError, TaskResult};

/// Whether tools fix files or only verify them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Mutate files in place; lint tools never fail
    #[default]
    Fix,
    /// Verify only; enforce lint thresholds
    Check,
}

impl Mode {
    /// Parse the value of the `CHECK` variable.
    pub fn from_flag(value: &str) -> TaskResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Self::Check),
            "0" | "false" | "no" | "off" | "" => Ok(Self::Fix),
            _ => Err(TaskError::InvalidValue {
                variable: "CHECK".to_string(),
                value: value.to_string(),
                reason: "expected 0 or 1".to_string(),
            }),
        }
    }

    /// Check if this is check mode.
    pub fn is_check(self) -> bool {
        self == Self::Check
    }
}

impl From<bool> for Mode {
    fn from(check: bool) -> Self {
        if check {
            Self::Check
        } else {
            Self::Fix
        }
    }
}

impl FromStr for Mode {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_flag(s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fix => f.write_str("fix"),
            Self::Check => f.write_str("check"),
        }
    }
}

/// Parse a `MAX_LINE_LENGTH` value.
pub fn parse_line_length(value: &str) -> TaskResult<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TaskError::InvalidValue {
            variable: "MAX_LINE_LENGTH".to_string(),
            value: value.to_string(),
            reason: "expected a positive integer".to_string(),
        }),
    }
}

/// Values set from outside the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `CHECK`
    pub mode: Option<Mode>,

    /// `MAX_LINE_LENGTH`
    pub max_line_length: Option<u32>,
}

impl Overrides {
    /// Apply a `KEY=VALUE` assignment. Later assignments win.
    pub fn assign(&mut self, key: &str, value: &str) -> TaskResult<()> {
        match key {
            "CHECK" => self.mode = Some(Mode::from_flag(value)?),
            "MAX_LINE_LENGTH" => self.max_line_length = Some(parse_line_length(value)?),
            _ => return Err(TaskError::InvalidOverride(key.to_string())),
        }
        Ok(())
    }
}

/// Everything the tasks need, resolved once per invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Project root; every command runs here and every path is relative to it
    pub root: PathBuf,

    pub mode: Mode,
    pub max_line_length: u32,
    pub python: String,
    pub package: String,
    pub format_dirs: Vec<String>,
    pub lint_dirs: Vec<String>,
    pub tests_dir: String,
    pub docs_dir: String,
    pub artifacts: Vec<String>,
    pub thresholds: Thresholds,
}

impl Settings {
    /// Resolve settings for `root` from a config and overrides.
    pub fn resolve(root: &Path, config: &Config, overrides: &Overrides) -> Self {
        let package = config
            .paths
            .package
            .clone()
            .or_else(|| detect_package_name(root))
            .unwrap_or_else(|| DEFAULT_PACKAGE.to_string());

        let mode = overrides.mode.unwrap_or_else(|| config.general.check.unwrap_or(false).into());

        Self {
            root: root.to_path_buf(),
            mode,
            max_line_length: overrides.max_line_length.unwrap_or(config.general.max_line_length),
            python: config.general.python.clone(),
            package,
            format_dirs: config.paths.format_dirs.clone(),
            lint_dirs: config.paths.lint_dirs.clone(),
            tests_dir: config.paths.tests_dir.clone(),
            docs_dir: config.paths.docs_dir.clone(),
            thresholds: config.thresholds.clone(),
            artifacts: config.clean.artifacts.clone(),
        }
    }

    /// Default settings for `root`.
    pub fn defaults(root: &Path) -> Self {
        Self::resolve(root, &Config::default(), &Overrides::default())
    }

    /// Return a copy in the given mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Return a copy with a different line length.
    #[must_use]
    pub fn with_max_line_length(mut self, max_line_length: u32) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Sphinx source directory.
    pub fn docs_source(&self) -> String {
        format!("{}/source", self.docs_dir)
    }

    /// Output directory of generated API stubs.
    pub fn docs_api_dir(&self) -> String {
        format!("{}/source/api", self.docs_dir)
    }

    /// Sphinx build root.
    pub fn docs_build_dir(&self) -> String {
        format!("{}/_build", self.docs_dir)
    }

    /// Paths removed by `clean-docs`.
    pub fn docs_artifacts(&self) -> Vec<String> {
        vec![self.docs_build_dir(), self.docs_api_dir()]
    }
}
