//! End-to-end checks of the release_assembler binary.
//!
//! These never reach a real toolchain: every fixture points the toolchain
//! search list at an empty directory so the run stops at the build
//! prerequisites.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn write_config(root: &Path) {
    let no_vs = root.join("no-visual-studio");
    std::fs::write(
        root.join("release.toml"),
        format!(
            "[toolchain]\ninstallations = ['{}']\n\n[archive]\nsearch_path = false\ncandidates = []\n",
            no_vs.display()
        ),
    )
    .unwrap();
}

fn assembler() -> Command {
    Command::cargo_bin("release_assembler").unwrap()
}

#[test]
fn help_lists_invocation_flags() {
    assembler()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--portable"))
        .stdout(predicate::str::contains("--installer"))
        .stdout(predicate::str::contains("--x86"));
}

#[test]
fn conflicting_architectures_are_rejected() {
    assembler()
        .args(["--x86", "--x64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn missing_developer_shell_exits_nonzero_with_expected_path() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path());

    assembler()
        .arg("--root")
        .arg(dir.path())
        .arg("--portable")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error in Building"))
        .stderr(predicate::str::contains("MissingPrerequisiteError"))
        .stderr(predicate::str::contains("VsDevCmd.bat"));

    assert!(!dir.path().join("release").join("Stremato-0.0.0-x64.7z").exists());
}

#[test]
fn failed_run_still_clears_previous_release() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path());
    let stale = dir.path().join("release").join("stale.dll");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, "old").unwrap();

    assembler()
        .arg("--root")
        .arg(dir.path())
        .assert()
        .code(1);

    assert!(dir.path().join("release").is_dir());
    assert!(!stale.exists());
    assert!(dir.path().join("prod").is_dir());
}

#[test]
fn invalid_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("release.toml"), "unknown_key = 1\n").unwrap();

    assembler()
        .arg("--root")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TOML error"));
}

#[test]
fn release_dir_at_project_root_is_refused_before_cleaning() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("src").join("main.cpp");
    std::fs::create_dir_all(source.parent().unwrap()).unwrap();
    std::fs::write(&source, "int main() {}").unwrap();
    std::fs::write(dir.path().join("release.toml"), "[layout]\nrelease_dir = \".\"\n").unwrap();

    assembler()
        .arg("--root")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));

    assert!(source.exists());
    assert!(dir.path().join("release.toml").exists());
}
