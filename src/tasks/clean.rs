//! Cleanup tasks.

use crate::core::Settings;
use crate::pipeline::Step;

use super::Task;

/// Test, coverage and packaging artifacts.
pub(super) fn artifacts(settings: &Settings) -> Step {
    Step::remove(Task::Clean, settings.artifacts.iter().cloned())
}

/// Generated documentation.
pub(super) fn docs(settings: &Settings) -> Step {
    Step::remove(Task::CleanDocs, settings.docs_artifacts())
}
