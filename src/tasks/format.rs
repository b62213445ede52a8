//! Formatting tasks: black, isort and docformatter over the format directories.

use crate::core::{Command, Settings, ToolArgs};
use crate::pipeline::Step;

use super::Task;

/// Step for one formatting task.
pub(super) fn step(task: Task, settings: &Settings, args: &ToolArgs) -> Step {
    let (module, flags) = match task {
        Task::Black => ("black", &args.black),
        Task::Isort => ("isort", &args.isort),
        Task::Docformat => ("docformatter", &args.docformat),
        other => unreachable!("{other} is not a formatting task"),
    };

    let command = Command::python_module(task.name(), &settings.python, module)
        .args(&settings.format_dirs)
        .args(flags)
        .with_working_dir(&settings.root);

    Step::exec(task, command)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::Mode;

    fn command(task: Task, mode: Mode) -> Command {
        let settings = Settings::defaults(Path::new("/project")).with_mode(mode);
        let args = ToolArgs::resolve(&settings);
        step(task, &settings, &args).command().cloned().unwrap()
    }

    #[test]
    fn test_black_fix_mode() {
        let cmd = command(Task::Black, Mode::Fix);
        assert_eq!(cmd.command_line(), "python -m black docdeid tests --line-length 120");
        assert_eq!(cmd.dir(), Path::new("/project"));
    }

    #[test]
    fn test_black_check_mode() {
        let cmd = command(Task::Black, Mode::Check);
        assert_eq!(cmd.command_line(), "python -m black docdeid tests --check --line-length 120");
    }

    #[test]
    fn test_isort() {
        assert_eq!(command(Task::Isort, Mode::Fix).command_line(), "python -m isort docdeid tests");
        assert_eq!(
            command(Task::Isort, Mode::Check).command_line(),
            "python -m isort docdeid tests --check"
        );
    }

    #[test]
    fn test_docformat_modes() {
        let fix = command(Task::Docformat, Mode::Fix);
        assert_eq!(
            fix.command_line(),
            "python -m docformatter docdeid tests --in-place -r --black --wrap-summaries 120 --wrap-descriptions 120"
        );

        let check = command(Task::Docformat, Mode::Check);
        assert!(check.has_arg("--check"));
        assert!(!check.has_arg("--in-place"));
    }
}
