//! Linting tasks over the lint directories.
//!
//! None of these mutate files. In fix mode every linter only reports:
//! flake8 and pylint get `--exit-zero`, and since mypy has no such flag
//! each step is also marked as allowed to fail. Check mode enforces all
//! four.

use crate::core::{Command, Settings, ToolArgs};
use crate::pipeline::Step;

use super::Task;

/// Step for one linting task.
pub(super) fn step(task: Task, settings: &Settings, args: &ToolArgs) -> Step {
    let (module, flags) = match task {
        Task::Typehints => ("flake8", &args.typehints),
        Task::Doclint => ("pylint", &args.doclint),
        Task::Pylint => ("pylint", &args.pylint),
        Task::Mypy => ("mypy", &args.mypy),
        other => unreachable!("{other} is not a linting task"),
    };

    let command = Command::python_module(task.name(), &settings.python, module)
        .args(&settings.lint_dirs)
        .args(flags)
        .with_working_dir(&settings.root);

    Step::exec(task, command).allow_failure(!settings.mode.is_check())
}
