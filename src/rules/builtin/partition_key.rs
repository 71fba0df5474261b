//! Partition key declarations on topic configuration classes.
//!
//! Every class whose name matches `topic_config_pattern` must declare a
//! `partition_key` member as one of:
//!
//! - a typed attribute with a default: `partition_key: str = "tenant_id"`
//! - a `Field(...)`-style default: `partition_key: str = Field(default="id")`
//! - a bare assignment: `partition_key = "tenant_id"`
//!
//! Detection is syntactic; keys set in `__init__` or inherited from a base
//! class are not seen.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{PolicyError, Result};
use crate::policy::{PartitionKeyConfig, PARTITION_KEY};
use crate::rules::{sort_issues, Issue, Rule, Severity};
use crate::scan::{find_classes, logical_lines, relative_path, ClassDef, ImportGraph};

/// Issue code for topic configs without a partition key.
pub const MISSING_PARTITION_KEY: &str = "MISSING_PARTITION_KEY";

/// Context key holding the bare class name; `symbol` holds the dotted path.
pub const CONTEXT_CLASS_NAME: &str = "class_name";

const FIELD_NAME: &str = "partition_key";

static FIELD_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^\W\d]\w*\.)*(?:Field|field)\s*\(").expect("FIELD_CALL must compile")
});

static ANNOTATED_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bField\s*\(.*\bdefault(?:_factory)?\s*=").expect("ANNOTATED_FIELD must compile")
});

/// How a class declares its partition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionKeyForm {
    /// `partition_key: str = "..."`
    TypedDefault,
    /// `partition_key: str = Field(...)` or `partition_key = Field(...)`
    FieldDefault,
    /// `partition_key = "..."`
    Assignment,
}

/// Requires topic configuration classes to declare a partition key.
pub struct RulePartitionKey {
    config: PartitionKeyConfig,
    pattern: Regex,
}

impl RulePartitionKey {
    /// Create the rule, compiling `topic_config_pattern`.
    pub fn new(config: PartitionKeyConfig) -> Result<Self> {
        let pattern = Regex::new(&config.topic_config_pattern).map_err(|e| {
            PolicyError::invalid(format!(
                "rule '{}': invalid topic_config_pattern {:?}: {}",
                PARTITION_KEY, config.topic_config_pattern, e
            ))
        })?;
        Ok(Self { config, pattern })
    }

    pub fn config(&self) -> &PartitionKeyConfig {
        &self.config
    }

    fn suggestion(&self, class: &ClassDef) -> String {
        if self.config.allowed_strategies.is_empty() {
            format!("Declare `partition_key` on {}", class.name)
        } else {
            format!(
                "Declare `partition_key` on {} using one of the allowed strategies: {}",
                class.name,
                self.config.allowed_strategies.join(", ")
            )
        }
    }

    fn check_source(&self, relative: &str, source: &str, issues: &mut Vec<Issue>) {
        let lines = match logical_lines(source) {
            Ok(lines) => lines,
            Err(e) => {
                debug!("Skipping {}: {}", relative, e);
                return;
            }
        };

        for class in find_classes(&lines) {
            if !self.pattern.is_match(&class.name) || declared_form(&class).is_some() {
                continue;
            }

            issues.push(
                Issue::new(
                    MISSING_PARTITION_KEY,
                    self.config.severity,
                    format!(
                        "Topic config class '{}' does not declare a partition_key",
                        class.qualname
                    ),
                    relative,
                    class.line,
                )
                .with_column(class.column)
                .with_symbol(&class.qualname)
                .with_context(CONTEXT_CLASS_NAME, &class.name)
                .with_suggestion(self.suggestion(&class)),
            );
        }
    }
}

impl Rule for RulePartitionKey {
    fn name(&self) -> &'static str {
        PARTITION_KEY
    }

    fn description(&self) -> &str {
        "Requires topic configuration classes to declare a partition_key"
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn severity(&self) -> Severity {
        self.config.severity
    }

    fn validate(&self, graph: &ImportGraph, _repo_id: &str, repo_root: &Path) -> Vec<Issue> {
        if !self.config.enabled || !self.config.require_partition_key {
            return Vec::new();
        }

        let mut issues = Vec::new();
        for (path, file_imports) in graph {
            if !file_imports.is_parsed() {
                continue;
            }

            let relative = relative_path(repo_root, path);
            match fs::read_to_string(path) {
                Ok(source) => self.check_source(&relative, &source, &mut issues),
                Err(e) => debug!("Skipping {}: {}", relative, e),
            }
        }

        sort_issues(&mut issues);
        issues
    }
}

/// The first form in which `class` declares a partition key, if any.
pub fn declared_form(class: &ClassDef) -> Option<PartitionKeyForm> {
    class
        .members
        .iter()
        .find_map(|member| partition_key_form(&member.text))
}

/// Classify a single statement as a partition key declaration.
pub fn partition_key_form(statement: &str) -> Option<PartitionKeyForm> {
    let rest = statement.strip_prefix(FIELD_NAME)?;
    if rest.starts_with(|c: char| c == '_' || c.is_alphanumeric()) {
        return None;
    }
    let rest = rest.trim_start();

    if let Some(annotated) = rest.strip_prefix(':') {
        return match top_level_assignment(annotated) {
            Some(idx) => classify_value(&annotated[idx + 1..]),
            None if ANNOTATED_FIELD.is_match(annotated) => Some(PartitionKeyForm::FieldDefault),
            None => None,
        };
    }

    let value = rest.strip_prefix('=')?;
    if value.starts_with('=') {
        return None;
    }
    classify_value(value).map(|form| match form {
        PartitionKeyForm::TypedDefault => PartitionKeyForm::Assignment,
        other => other,
    })
}

fn classify_value(value: &str) -> Option<PartitionKeyForm> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else if FIELD_CALL.is_match(value) {
        Some(PartitionKeyForm::FieldDefault)
    } else {
        Some(PartitionKeyForm::TypedDefault)
    }
}

/// Byte index of the first `=` outside brackets that is an assignment.
fn top_level_assignment(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    for (idx, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'=' if depth == 0 => {
                let prev = idx.checked_sub(1).map(|i| bytes[i]);
                let next = bytes.get(idx + 1).copied();
                let comparison =
                    next == Some(b'=') || matches!(prev, Some(b'=' | b'!' | b'<' | b'>'));
                if !comparison {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}
