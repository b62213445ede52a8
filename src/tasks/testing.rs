//! Test task: pytest with coverage.

use crate::core::{Command, Settings, ToolArgs};
use crate::pipeline::Step;

use super::Task;

/// Coverage-instrumented pytest run over the tests directory.
///
/// Writes `htmlcov/`, `coverage.lcov` and `.coverage` as side effects and
/// fails when coverage is below the configured floor.
pub(super) fn step(settings: &Settings, args: &ToolArgs) -> Step {
    let command = Command::python_module(Task::Test.name(), &settings.python, "pytest")
        .args(&args.pytest)
        .arg(&settings.tests_dir)
        .with_working_dir(&settings.root);

    Step::exec(Task::Test, command)
}
