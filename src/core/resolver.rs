//! Per-tool argument resolution.
//!
//! Turns the mode and line length into the flags each tool is run with.
//! Directory operands are not part of these lists; the task builders put
//! them in front.

use serde::Serialize;

use super::settings::Settings;

/// Pylint messages checked by `doclint`: missing module, class and function docstrings.
pub const DOCSTRING_MESSAGES: &str = "C0114,C0115,C0116";

/// flake8-type-hints codes checked by `typehints`.
pub const TYPE_HINT_CODES: &str = "TH01,TH02";

/// Flags for every tool, for one mode and line length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolArgs {
    pub black: Vec<String>,
    pub isort: Vec<String>,
    pub docformat: Vec<String>,
    pub typehints: Vec<String>,
    pub doclint: Vec<String>,
    pub pylint: Vec<String>,
    pub mypy: Vec<String>,
    pub pytest: Vec<String>,
}

impl ToolArgs {
    /// Resolve flags from settings.
    pub fn resolve(settings: &Settings) -> Self {
        let check = settings.mode.is_check();
        let line_length = settings.max_line_length.to_string();
        let thresholds = &settings.thresholds;

        let mut black = Vec::new();
        if check {
            black.push("--check".to_string());
        }
        black.extend(["--line-length".to_string(), line_length.clone()]);

        let isort = if check { vec!["--check".to_string()] } else { Vec::new() };

        let docformat = [
            if check { "--check" } else { "--in-place" },
            "-r",
            "--black",
            "--wrap-summaries",
            line_length.as_str(),
            "--wrap-descriptions",
            line_length.as_str(),
        ]
        .map(String::from)
        .to_vec();

        let mut typehints = ["--select", TYPE_HINT_CODES, "--max-line-length", line_length.as_str()]
            .map(String::from)
            .to_vec();
        if !check {
            typehints.push("--exit-zero".to_string());
        }

        let mut doclint = vec!["--disable=all".to_string(), format!("--enable={DOCSTRING_MESSAGES}")];
        doclint.extend(gate(check, thresholds.doclint_fail_under));

        let pylint = gate(check, thresholds.pylint_fail_under);

        let pytest = vec![
            format!("--cov={}", settings.package),
            "--cov-report".to_string(),
            "html".to_string(),
            "--cov-report".to_string(),
            "lcov".to_string(),
            format!("--cov-fail-under={}", thresholds.coverage_fail_under),
        ];

        Self { black, isort, docformat, typehints, doclint, pylint, mypy: Vec::new(), pytest }
    }
}

/// `--fail-under <score>` in check mode, `--exit-zero` otherwise.
fn gate(check: bool, fail_under: f64) -> Vec<String> {
    if check {
        vec!["--fail-under".to_string(), format_score(fail_under)]
    } else {
        vec!["--exit-zero".to_string()]
    }
}

/// Format a score keeping at least one decimal (`10` -> `10.0`).
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        score.to_string()
    }
}
