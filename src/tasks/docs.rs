//! Documentation tasks.
//!
//! API stubs are regenerated from scratch (`--force`), then sphinx builds
//! the HTML site. Nothing is cached between runs.

use crate::core::{Command, Settings};
use crate::pipeline::Step;

use super::Task;

/// `sphinx.ext.apidoc` followed by a sphinx build, both through the
/// configured interpreter.
pub(super) fn steps(settings: &Settings) -> Vec<Step> {
    let apidoc = Command::python_module("apidoc", &settings.python, "sphinx.ext.apidoc")
        .args(["--module-first", "--force"])
        .arg(format!("--templatedir={}/templates", settings.docs_dir))
        .args(["-o".to_string(), settings.docs_api_dir(), settings.package.clone()])
        .with_working_dir(&settings.root);

    let build = Command::python_module("sphinx-build", &settings.python, "sphinx")
        .args([settings.docs_source(), format!("{}/html", settings.docs_build_dir())])
        .args(["-c", settings.docs_dir.as_str()])
        .with_working_dir(&settings.root);

    vec![Step::exec(Task::BuildDocs, apidoc), Step::exec(Task::BuildDocs, build)]
}
