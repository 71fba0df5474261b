//! Integration tests for policy loading and inheritance.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use xrepo_validate::error::ErrorCode;
use xrepo_validate::policy::{load_policy, load_policy_value, RuleConfig, PARTITION_KEY};
use xrepo_validate::rules::Severity;
use xrepo_validate::PolicyError;

const POLICY_A: &str = r#"
policy_id: platform
policy_version: {major: 2, minor: 1, patch: 0}
repo_id: base_repo
discovery:
  include_globs: ["src/**/*.py"]
  exclude_globs: ["**/tests/**"]
rules:
  partition_key:
    severity: critical
    allowed_strategies: [hash]
  repo_boundaries:
    ownership:
      "base.": base_repo
    forbidden_import_prefixes: [internal.private]
"#;

const POLICY_B: &str = r#"
extends: ../shared/a.yaml
policy_id: my_app_policy
repo_id: my_app
discovery:
  include_globs: ["scripts/*.py"]
rules:
  repo_boundaries:
    ownership:
      "my_app.": my_app
    forbidden_import_prefixes: [internal_module]
"#;

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "shared/a.yaml", POLICY_A);
    write(temp.path(), "app/b.yaml", POLICY_B);
    temp
}

#[test]
fn policy_without_extends_matches_raw_document() {
    let temp = setup();
    let path = temp.path().join("shared/a.yaml");

    let policy = load_policy(&path).unwrap();
    let raw = load_policy_value(&path).unwrap();

    assert_eq!(policy.policy_id, raw["policy_id"].as_str().unwrap());
    assert_eq!(policy.repo_id, "base_repo");
    assert_eq!(policy.policy_version.to_string(), "2.1.0");
    assert_eq!(policy.discovery.include_globs, vec!["src/**/*.py"]);
    assert!(policy.extends.is_none());
    assert_eq!(policy.rules.len(), 2);
}

#[test]
fn child_merges_with_parent() {
    let temp = setup();

    let policy = load_policy(&temp.path().join("app/b.yaml")).unwrap();

    assert_eq!(policy.policy_id, "my_app_policy");
    assert_eq!(policy.repo_id, "my_app");
    assert_eq!(policy.policy_version.major, 2);
    assert!(policy.extends.is_none());
    assert_eq!(
        policy.discovery.include_globs,
        vec!["src/**/*.py", "scripts/*.py"]
    );
    assert_eq!(policy.discovery.exclude_globs, vec!["**/tests/**"]);

    let boundaries = policy.repo_boundaries().unwrap();
    assert_eq!(boundaries.ownership.len(), 2);
    assert_eq!(boundaries.ownership["base."], "base_repo");
    assert_eq!(boundaries.ownership["my_app."], "my_app");
    assert_eq!(
        boundaries.forbidden_import_prefixes,
        vec!["internal.private", "internal_module"]
    );
}

#[test]
fn untouched_rules_are_inherited_verbatim() {
    let temp = setup();

    let parent = load_policy(&temp.path().join("shared/a.yaml")).unwrap();
    let child = load_policy(&temp.path().join("app/b.yaml")).unwrap();

    assert_eq!(child.rules[PARTITION_KEY], parent.rules[PARTITION_KEY]);
    match &child.rules[PARTITION_KEY] {
        RuleConfig::PartitionKey(config) => {
            assert_eq!(config.severity, Severity::Critical);
            assert_eq!(config.allowed_strategies, vec!["hash"]);
        }
        other => panic!("unexpected rule config: {other:?}"),
    }
}

#[test]
fn duplicate_list_entries_are_kept() {
    let temp = setup();
    write(
        temp.path(),
        "app/dup.yaml",
        "extends: ../shared/a.yaml\nrules:\n  repo_boundaries:\n    forbidden_import_prefixes: [internal.private]\n",
    );

    let policy = load_policy(&temp.path().join("app/dup.yaml")).unwrap();

    assert_eq!(
        policy.repo_boundaries().unwrap().forbidden_import_prefixes,
        vec!["internal.private", "internal.private"]
    );
}

#[test]
fn grandchild_is_rejected() {
    let temp = setup();
    write(temp.path(), "app/c.yaml", "extends: ./b.yaml\nrepo_id: c\n");

    let err = load_policy(&temp.path().join("app/c.yaml")).unwrap_err();

    assert_eq!(err.code(), ErrorCode::ConfigurationParseError);
    let message = err.to_string();
    assert!(message.contains("multi-level"));
    assert!(message.contains("not supported"));
}

#[test]
fn missing_parent_names_the_path() {
    let temp = setup();
    write(temp.path(), "app/orphan.yaml", "extends: ./nowhere.yaml\n");

    let err = load_policy(&temp.path().join("app/orphan.yaml")).unwrap_err();

    assert_eq!(err.code(), ErrorCode::FileNotFound);
    assert!(err.to_string().contains("nowhere.yaml"));
}

#[test]
fn absolute_extends_path() {
    let temp = setup();
    let parent = temp.path().join("shared/a.yaml");
    write(
        temp.path(),
        "elsewhere/abs.yaml",
        &format!("extends: {:?}\nrepo_id: abs\n", parent.display().to_string()),
    );

    let policy = load_policy(&temp.path().join("elsewhere/abs.yaml")).unwrap();

    assert_eq!(policy.repo_id, "abs");
    assert_eq!(policy.policy_id, "platform");
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "bad.yaml", "policy_id: [unclosed\n");

    let err = load_policy(&temp.path().join("bad.yaml")).unwrap_err();

    assert!(matches!(err, PolicyError::ConfigParseError { .. }));
}

#[test]
fn unknown_rule_is_a_validation_error() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "p.yaml",
        "policy_id: p\npolicy_version: {major: 1, minor: 0, patch: 0}\nrepo_id: r\nrules:\n  no_such_rule: {}\n",
    );

    let err = load_policy(&temp.path().join("p.yaml")).unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert!(err.to_string().contains("no_such_rule"));
}
