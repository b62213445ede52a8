//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test, isolated from the caller's CHECK / MAX_LINE_LENGTH.
fn tasks() -> Command {
    let mut cmd = Command::cargo_bin("docdeid-tasks").unwrap();
    cmd.env_remove("CHECK").env_remove("MAX_LINE_LENGTH").env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    tasks().arg("--help").assert().success().stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    tasks()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// List Command Tests
// ============================================================================

#[test]
fn test_list_shows_all_tasks() {
    let assert = tasks().arg("list").assert().success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    for name in [
        "format", "lint", "black", "isort", "docformat", "typehints", "doclint", "pylint", "mypy",
        "test", "build-docs", "clean", "clean-docs",
    ] {
        assert!(out.contains(name), "missing task {name}");
    }
    assert!(out.contains("Total: 13 tasks"));
}

#[test]
fn test_list_with_json_output() {
    tasks()
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stdout(predicate::str::contains("\"name\": \"build-docs\""));
}

#[test]
fn test_list_unknown_format() {
    tasks().args(["list", "--format", "yaml"]).assert().failure();
}

// ============================================================================
// Plan (dry run) Tests
// ============================================================================

#[test]
fn test_plan_format_default_mode() {
    let temp = assert_fs::TempDir::new().unwrap();

    tasks()
        .args(["plan", "format"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[black] python -m black docdeid tests --line-length 120",
        ))
        .stdout(predicate::str::contains("[isort] python -m isort docdeid tests\n"))
        .stdout(predicate::str::contains("--in-place"))
        .stdout(predicate::str::contains("--check").not());

    temp.close().unwrap();
}

#[test]
fn test_plan_lint_check_operand() {
    let temp = assert_fs::TempDir::new().unwrap();

    tasks()
        .args(["plan", "lint", "CHECK=1"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--fail-under 10.0"))
        .stdout(predicate::str::contains("[pylint] python -m pylint docdeid --fail-under 9.0"))
        .stdout(predicate::str::contains("--exit-zero").not());

    temp.close().unwrap();
}

#[test]
fn test_check_from_environment() {
    let temp = assert_fs::TempDir::new().unwrap();

    tasks()
        .args(["plan", "black"])
        .env("CHECK", "1")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--check --line-length 120"));

    temp.close().unwrap();
}

#[test]
fn test_operand_overrides_environment() {
    let temp = assert_fs::TempDir::new().unwrap();

    tasks()
        .args(["plan", "pylint", "CHECK=0"])
        .env("CHECK", "1")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--exit-zero"));

    temp.close().unwrap();
}

#[test]
fn test_check_flag() {
    let temp = assert_fs::TempDir::new().unwrap();

    tasks()
        .args(["--check", "plan", "docformat"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--check"))
        .stdout(predicate::str::contains("--in-place").not());

    temp.close().unwrap();
}

#[test]
fn test_max_line_length_is_consistent() {
    let temp = assert_fs::TempDir::new().unwrap();

    tasks()
        .args(["plan", "black", "docformat", "typehints", "MAX_LINE_LENGTH=100"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--line-length 100"))
        .stdout(predicate::str::contains("--wrap-summaries 100 --wrap-descriptions 100"))
        .stdout(predicate::str::contains("--max-line-length 100"))
        .stdout(predicate::str::contains("120").not());

    temp.close().unwrap();
}

#[test]
fn test_plan_docs_and_clean() {
    let temp = assert_fs::TempDir::new().unwrap();

    tasks()
        .args(["plan", "build-docs", "clean-docs"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[build-docs] python -m sphinx.ext.apidoc"))
        .stdout(predicate::str::contains("[build-docs] python -m sphinx docs/source docs/_build/html"))
        .stdout(predicate::str::contains("[clean-docs] remove docs/_build docs/source/api"));

    temp.close().unwrap();
}

#[test]
fn test_dry_run_flag_does_not_clean() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".coverage").write_str("data").unwrap();

    tasks().args(["--dry-run", "run", "clean"]).current_dir(temp.path()).assert().success();

    temp.child(".coverage").assert(predicate::path::exists());
    temp.close().unwrap();
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_unknown_task() {
    tasks()
        .args(["plan", "deploy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown task 'deploy'"));
}

#[test]
fn test_invalid_check_value() {
    tasks()
        .args(["plan", "lint", "CHECK=maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CHECK"));
}

#[test]
fn test_unknown_variable() {
    tasks()
        .args(["plan", "lint", "FOO=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown variable 'FOO'"));
}

#[test]
fn test_only_assignments() {
    tasks().args(["plan", "CHECK=1"]).assert().failure().stderr(predicate::str::contains("No tasks"));
}

#[test]
fn test_missing_directory() {
    tasks()
        .args(["-C", "/definitely/not/here", "plan", "lint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_file_is_used() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("docdeid-tasks.toml")
        .write_str(
            r#"
[general]
python = "python3"
max_line_length = 99

[paths]
lint_dirs = ["docdeid", "scripts"]
"#,
        )
        .unwrap();

    tasks()
        .args(["plan", "mypy", "black"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[mypy] python3 -m mypy docdeid scripts"))
        .stdout(predicate::str::contains("--line-length 99"));

    temp.close().unwrap();
}

#[test]
fn test_invalid_config_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("bad.toml").write_str("[general\n").unwrap();

    tasks()
        .args(["-c", "bad.toml", "plan", "lint"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.toml"));

    temp.close().unwrap();
}

#[test]
fn test_package_from_pyproject() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("pyproject.toml").write_str("[tool.poetry]\nname = \"deduce\"\n").unwrap();

    tasks()
        .args(["plan", "test"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--cov=deduce"));

    temp.close().unwrap();
}

#[test]
fn test_config_shows_resolved_settings() {
    let temp = assert_fs::TempDir::new().unwrap();

    tasks()
        .args(["--max-line-length", "110", "--check", "config"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("mode = \"check\""))
        .stdout(predicate::str::contains("max_line_length = 110"));

    temp.close().unwrap();
}

#[test]
fn test_config_path() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("docdeid-tasks.toml").write_str("").unwrap();

    tasks()
        .args(["config", "--path"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("docdeid-tasks.toml"));

    temp.close().unwrap();
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_bash_completions() {
    tasks()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docdeid-tasks"));
}
