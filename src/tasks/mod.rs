//! Task catalogue.
//!
//! Every task the runner knows, how aggregates expand into leaf tasks,
//! and how leaf tasks become pipeline steps.

mod clean;
mod docs;
mod format;
mod lint;
mod testing;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::core::{Overrides, Settings, ToolArgs};
use crate::error::{TaskError, TaskResult};
use crate::pipeline::Step;

/// A named task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Format,
    Lint,
    Black,
    Isort,
    Docformat,
    Typehints,
    Doclint,
    Pylint,
    Mypy,
    Test,
    BuildDocs,
    Clean,
    CleanDocs,
}

impl Task {
    /// Every task, in catalogue order.
    pub const ALL: [Self; 13] = [
        Self::Format,
        Self::Lint,
        Self::Black,
        Self::Isort,
        Self::Docformat,
        Self::Typehints,
        Self::Doclint,
        Self::Pylint,
        Self::Mypy,
        Self::Test,
        Self::BuildDocs,
        Self::Clean,
        Self::CleanDocs,
    ];

    /// Name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Lint => "lint",
            Self::Black => "black",
            Self::Isort => "isort",
            Self::Docformat => "docformat",
            Self::Typehints => "typehints",
            Self::Doclint => "doclint",
            Self::Pylint => "pylint",
            Self::Mypy => "mypy",
            Self::Test => "test",
            Self::BuildDocs => "build-docs",
            Self::Clean => "clean",
            Self::CleanDocs => "clean-docs",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Format => "Run all formatters (black, isort, docformat)",
            Self::Lint => "Run all linters (typehints, doclint, pylint, mypy)",
            Self::Black => "Format code with black",
            Self::Isort => "Sort imports with isort",
            Self::Docformat => "Wrap docstrings with docformatter",
            Self::Typehints => "Check for missing type hints with flake8",
            Self::Doclint => "Check for missing docstrings with pylint",
            Self::Pylint => "Lint code with pylint",
            Self::Mypy => "Type-check code with mypy",
            Self::Test => "Run tests with coverage",
            Self::BuildDocs => "Generate API stubs and build the HTML docs",
            Self::Clean => "Remove test, coverage and build artifacts",
            Self::CleanDocs => "Remove generated documentation",
        }
    }

    /// Whether this task only fans out to other tasks.
    pub fn is_aggregate(self) -> bool {
        matches!(self, Self::Format | Self::Lint)
    }

    /// Leaf tasks this task runs, in order.
    pub fn expand(self) -> Vec<Self> {
        match self {
            Self::Format => vec![Self::Black, Self::Isort, Self::Docformat],
            Self::Lint => vec![Self::Typehints, Self::Doclint, Self::Pylint, Self::Mypy],
            leaf => vec![leaf],
        }
    }

    /// Pipeline steps for this task.
    pub fn steps(self, settings: &Settings, args: &ToolArgs) -> Vec<Step> {
        match self {
            Self::Format | Self::Lint => {
                self.expand().into_iter().flat_map(|t| t.steps(settings, args)).collect()
            }
            Self::Black | Self::Isort | Self::Docformat => {
                vec![format::step(self, settings, args)]
            }
            Self::Typehints | Self::Doclint | Self::Pylint | Self::Mypy => {
                vec![lint::step(self, settings, args)]
            }
            Self::Test => vec![testing::step(settings, args)],
            Self::BuildDocs => docs::steps(settings),
            Self::Clean => vec![clean::artifacts(settings)],
            Self::CleanDocs => vec![clean::docs(settings)],
        }
    }

    fn available() -> String {
        Self::ALL.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for Task {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| TaskError::UnknownTask { name: s.to_string(), available: Self::available() })
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Task {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Catalogue entry, as shown by `list`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub aggregate: bool,
    pub runs: Vec<&'static str>,
}

impl From<Task> for TaskInfo {
    fn from(task: Task) -> Self {
        Self {
            name: task.name(),
            description: task.description(),
            aggregate: task.is_aggregate(),
            runs: task.expand().into_iter().map(Task::name).collect(),
        }
    }
}

/// The whole catalogue.
pub fn catalogue() -> Vec<TaskInfo> {
    Task::ALL.into_iter().map(TaskInfo::from).collect()
}

/// Task operands split into tasks and `KEY=VALUE` assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Tasks in the order given
    pub tasks: Vec<Task>,

    /// Values assigned by operands
    pub overrides: Overrides,
}

impl Invocation {
    /// Parse operands such as `["lint", "CHECK=1"]`.
    ///
    /// Assignments are applied on top of `base`, wherever they appear.
    pub fn parse<S: AsRef<str>>(operands: &[S], base: Overrides) -> TaskResult<Self> {
        let mut tasks = Vec::new();
        let mut overrides = base;

        for operand in operands {
            let operand = operand.as_ref();
            match operand.split_once('=') {
                Some((key, value)) => overrides.assign(key, value)?,
                None => tasks.push(operand.parse()?),
            }
        }

        if tasks.is_empty() {
            return Err(TaskError::NoTasks);
        }

        Ok(Self { tasks, overrides })
    }
}

/// Steps for a sequence of tasks, in order.
pub fn plan(tasks: &[Task], settings: &Settings) -> Vec<Step> {
    let args = ToolArgs::resolve(settings);
    tasks.iter().flat_map(|t| t.steps(settings, &args)).collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::Mode;

    fn settings() -> Settings {
        Settings::defaults(Path::new("/nonexistent"))
    }

    fn labels(steps: &[Step]) -> Vec<&str> {
        steps.iter().map(|s| s.task.name()).collect()
    }

    #[test]
    fn test_names_round_trip() {
        for task in Task::ALL {
            assert_eq!(task.name().parse::<Task>().unwrap(), task);
        }
    }

    #[test]
    fn test_unknown_task() {
        let err = "deploy".parse::<Task>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("deploy"));
        assert!(message.contains("build-docs"));
    }

    #[test]
    fn test_format_expands_in_order() {
        let steps = plan(&[Task::Format], &settings());
        assert_eq!(labels(&steps), vec!["black", "isort", "docformat"]);
    }

    #[test]
    fn test_lint_expands_in_order() {
        let steps = plan(&[Task::Lint], &settings());
        assert_eq!(labels(&steps), vec!["typehints", "doclint", "pylint", "mypy"]);
    }

    #[test]
    fn test_only_format_and_lint_are_aggregates() {
        let aggregates: Vec<Task> = Task::ALL.into_iter().filter(|t| t.is_aggregate()).collect();
        assert_eq!(aggregates, vec![Task::Format, Task::Lint]);
        assert_eq!(Task::Test.expand(), vec![Task::Test]);
    }

    #[test]
    fn test_multiple_tasks_keep_order() {
        let steps = plan(&[Task::Clean, Task::Format, Task::Mypy], &settings());
        assert_eq!(labels(&steps), vec!["clean", "black", "isort", "docformat", "mypy"]);
    }

    #[test]
    fn test_invocation_parse() {
        let invocation = Invocation::parse(&["lint", "CHECK=1", "test"], Overrides::default()).unwrap();

        assert_eq!(invocation.tasks, vec![Task::Lint, Task::Test]);
        assert_eq!(invocation.overrides.mode, Some(Mode::Check));
    }

    #[test]
    fn test_invocation_assignment_beats_base() {
        let base = Overrides { mode: Some(Mode::Check), max_line_length: Some(100) };
        let invocation = Invocation::parse(&["MAX_LINE_LENGTH=88", "black"], base).unwrap();

        assert_eq!(invocation.overrides.mode, Some(Mode::Check));
        assert_eq!(invocation.overrides.max_line_length, Some(88));
    }

    #[test]
    fn test_invocation_errors() {
        assert!(matches!(
            Invocation::parse(&["CHECK=1"], Overrides::default()),
            Err(TaskError::NoTasks)
        ));
        assert!(matches!(
            Invocation::parse(&["lint", "FOO=1"], Overrides::default()),
            Err(TaskError::InvalidOverride(_))
        ));
        assert!(matches!(
            Invocation::parse(&["lint", "CHECK=maybe"], Overrides::default()),
            Err(TaskError::InvalidValue { .. })
        ));
        assert!(matches!(
            Invocation::parse(&["lnt"], Overrides::default()),
            Err(TaskError::UnknownTask { .. })
        ));
    }

    #[test]
    fn test_catalogue() {
        let entries = catalogue();
        assert_eq!(entries.len(), 13);

        let lint = entries.iter().find(|e| e.name == "lint").unwrap();
        assert!(lint.aggregate);
        assert_eq!(lint.runs, vec!["typehints", "doclint", "pylint", "mypy"]);
    }
}
