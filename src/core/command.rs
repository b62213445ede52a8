//! Command data structures.
//!
//! A `Command` is one external program invocation: a program, its argument
//! vector, and where to run it. Arguments are passed to the process as-is;
//! nothing goes through a shell.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A single external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Label shown in progress output (usually the task name)
    pub name: String,

    /// Program to execute
    pub program: String,

    /// Arguments, in order
    pub args: Vec<String>,

    /// Working directory for execution
    pub working_dir: Option<PathBuf>,
}

impl Command {
    /// Create a new command with no arguments.
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Create a `<python> -m <module>` command.
    pub fn python_module(name: impl Into<String>, python: &str, module: &str) -> Self {
        Self::new(name, python).arg("-m").arg(module)
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Working directory, or `.` when none is set.
    pub fn dir(&self) -> &Path {
        self.working_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }

    #[cfg(test)]
    pub(crate) fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// Value of the argument directly following `flag`.
    #[cfg(test)]
    pub(crate) fn arg_value(&self, flag: &str) -> Option<&str> {
        self.args.iter().position(|a| a == flag).and_then(|i| self.args.get(i + 1)).map(String::as_str)
    }

    /// Render as a single shell-style line for display.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Quote a word for display if it contains whitespace or quotes.
fn quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    if word.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        format!("'{}'", word.replace('\'', r"'\''"))
    } else {
        word.to_string()
    }
}
