//! Configuration management.
//!
//! Handles loading configuration from TOML files. Every field is optional
//! in the file; anything missing falls back to the docdeid defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{TaskError, TaskResult};

/// Name of the project-local config file.
pub const CONFIG_FILE_NAME: &str = "docdeid-tasks.toml";

/// Default maximum line length shared by black, docformatter and flake8.
pub const DEFAULT_MAX_LINE_LENGTH: u32 = 120;

/// Package name used when neither the config nor pyproject.toml names one.
pub const DEFAULT_PACKAGE: &str = "docdeid";

/// Runner configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Source, test and docs locations
    pub paths: PathsConfig,

    /// Quality gates enforced in check mode
    pub thresholds: Thresholds,

    /// Generated artifacts removed by `clean`
    pub clean: CleanConfig,
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Python interpreter used for `-m` invocations
    pub python: String,

    /// Default mode (`CHECK` overrides it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<bool>,

    /// Maximum line length
    pub max_line_length: u32,
}

/// Source, test and docs locations, relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Package under test and documentation; detected from pyproject.toml when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Directories formatted by black, isort and docformatter
    pub format_dirs: Vec<String>,

    /// Directories checked by the linters
    pub lint_dirs: Vec<String>,

    /// Test directory passed to pytest
    pub tests_dir: String,

    /// Sphinx documentation root
    pub docs_dir: String,
}

/// Quality thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum docstring lint score in check mode
    pub doclint_fail_under: f64,

    /// Minimum pylint score in check mode
    pub pylint_fail_under: f64,

    /// Minimum test coverage percentage
    pub coverage_fail_under: u32,
}

/// Cleanup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Paths removed by `clean`
    pub artifacts: Vec<String>,
}

impl Config {
    /// Load configuration for a project root.
    ///
    /// Looks for config in:
    /// 1. `docdeid-tasks.toml` in the project root
    /// 2. `~/.config/docdeid-tasks/config.toml`
    /// 3. Falls back to defaults
    pub fn load(root: &Path) -> TaskResult<Self> {
        match Self::locate(root) {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Find the config file that [`Config::load`] would read.
    pub fn locate(root: &Path) -> Option<PathBuf> {
        let local_config = root.join(CONFIG_FILE_NAME);
        if local_config.is_file() {
            return Some(local_config);
        }

        Self::config_dir().map(|d| d.join("config.toml")).filter(|p| p.is_file())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> TaskResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TaskError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|e| TaskError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        config.general.python = shellexpand::tilde(&config.general.python).into_owned();
        Ok(config)
    }

    /// Get the global config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("docdeid-tasks"))
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { python: "python".to_string(), check: None, max_line_length: DEFAULT_MAX_LINE_LENGTH }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            package: None,
            format_dirs: vec!["docdeid".to_string(), "tests".to_string()],
            lint_dirs: vec!["docdeid".to_string()],
            tests_dir: "tests".to_string(),
            docs_dir: "docs".to_string(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { doclint_fail_under: 10.0, pylint_fail_under: 9.0, coverage_fail_under: 80 }
    }
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            artifacts: [".coverage", "htmlcov", "coverage.lcov", ".pytest_cache", ".mypy_cache", "dist"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Subset of pyproject.toml that names the package.
#[derive(Debug, Default, Deserialize)]
struct PyProject {
    project: Option<NameTable>,
    tool: Option<PyProjectTool>,
}

#[derive(Debug, Default, Deserialize)]
struct PyProjectTool {
    poetry: Option<NameTable>,
}

#[derive(Debug, Default, Deserialize)]
struct NameTable {
    name: Option<String>,
}

/// Read the package name from `pyproject.toml` in `root`.
///
/// `[tool.poetry].name` wins over `[project].name`. Dashes become
/// underscores so the result is importable.
pub fn detect_package_name(root: &Path) -> Option<String> {
    let content = std::fs::read_to_string(root.join("pyproject.toml")).ok()?;
    let pyproject: PyProject = match toml::from_str(&content) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse pyproject.toml");
            return None;
        }
    };

    pyproject
        .tool
        .and_then(|t| t.poetry)
        .and_then(|p| p.name)
        .or_else(|| pyproject.project.and_then(|p| p.name))
        .map(|name| name.replace('-', "_"))
}
