//! Integration tests for the xrepo-validate binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const POLICY: &str = r#"
policy_id: cli-test
policy_version: {major: 1, minor: 0, patch: 0}
repo_id: my_app
rules:
  partition_key: {}
  repo_boundaries:
    severity: warning
    ownership:
      "base.": base_repo
"#;

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup_repo(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "xrepo-policy.yaml", POLICY);
    for (name, content) in files {
        write(temp.path(), name, content);
    }
    temp
}

fn xrepo(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("xrepo-validate"));
    cmd.current_dir(temp.path())
        .env_remove("XREPO_POLICY")
        .env_remove("XREPO_ROOT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("xrepo-validate"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cross-repository policy validation"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("xrepo-validate"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn check_clean_repository() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_repo(&[("app/main.py", "import os\n")]);
    xrepo(&temp)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
    Ok(())
}

#[test]
fn check_reports_issues_and_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_repo(&[(
        "topics.py",
        "class OrdersTopicConfig:\n    name = \"orders\"\n",
    )]);
    xrepo(&temp)
        .args(["check", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("error[MISSING_PARTITION_KEY]"))
        .stdout(predicate::str::contains("topics.py:1:1"));
    Ok(())
}

#[test]
fn check_fail_on_threshold() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_repo(&[("app.py", "import base.models\n")]);

    xrepo(&temp).arg("check").assert().success();
    xrepo(&temp)
        .args(["check", "--fail-on", "warning"])
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn check_json_output() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_repo(&[("app.py", "import base.models\n")]);

    let output = xrepo(&temp)
        .args(["check", "--format", "json"])
        .output()?;

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["summary"]["warning"], 1);
    assert_eq!(parsed["issues"][0]["context"]["owner"], "base_repo");
    Ok(())
}

#[test]
fn check_with_explicit_policy_and_root() -> Result<(), Box<dyn std::error::Error>> {
    let policies = TempDir::new()?;
    write(policies.path(), "policy.yaml", POLICY);
    let repo = TempDir::new()?;
    write(repo.path(), "topics.py", "class ATopicConfig:\n    x = 1\n");

    let mut cmd = Command::new(cargo_bin("xrepo-validate"));
    cmd.env_remove("XREPO_POLICY")
        .arg("check")
        .arg("--policy")
        .arg(policies.path().join("policy.yaml"))
        .arg("--root")
        .arg(repo.path());
    cmd.assert().code(1);
    Ok(())
}

#[test]
fn check_reads_environment() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_repo(&[("topics.py", "class ATopicConfig:\n    x = 1\n")]);
    let elsewhere = TempDir::new()?;

    let mut cmd = Command::new(cargo_bin("xrepo-validate"));
    cmd.current_dir(elsewhere.path())
        .env("XREPO_POLICY", temp.path().join("xrepo-policy.yaml"))
        .env("XREPO_ROOT", temp.path())
        .arg("check");
    cmd.assert().code(1);
    Ok(())
}

#[test]
fn missing_policy_exits_with_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let mut cmd = Command::new(cargo_bin("xrepo-validate"));
    cmd.current_dir(temp.path())
        .env_remove("XREPO_POLICY")
        .env_remove("XREPO_ROOT")
        .arg("check");
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("FILE_NOT_FOUND"));
    Ok(())
}

#[test]
fn multi_level_inheritance_exits_with_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_repo(&[]);
    write(temp.path(), "child.yaml", "extends: ./xrepo-policy.yaml\n");
    write(temp.path(), "grandchild.yaml", "extends: ./child.yaml\n");

    xrepo(&temp)
        .args(["check", "--policy", "grandchild.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("CONFIGURATION_PARSE_ERROR"))
        .stderr(predicate::str::contains("multi-level"));
    Ok(())
}

#[test]
fn show_policy_prints_merged_yaml() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_repo(&[]);
    write(
        temp.path(),
        "child.yaml",
        "extends: ./xrepo-policy.yaml\nrepo_id: child_repo\n",
    );

    xrepo(&temp)
        .args(["show-policy", "--policy", "child.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repo_id: child_repo"))
        .stdout(predicate::str::contains("policy_id: cli-test"))
        .stdout(predicate::str::contains("extends").not());
    Ok(())
}

#[test]
fn scan_prints_import_graph() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_repo(&[("pkg/a.py", "from base.models import Order\n")]);

    let output = xrepo(&temp).arg("scan").output()?;

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed[0]["file"], "pkg/a.py");
    assert_eq!(parsed[0]["imports"][0]["module"], "base.models");
    Ok(())
}
