//! Policy document schema.
//!
//! A policy names the repository being validated, selects files through
//! discovery globs and configures the built-in rules. Rule configurations are
//! a closed set keyed by rule name and are validated when the policy is
//! materialized, never at use time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use globset::Glob;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};
use crate::rules::Severity;

/// Rule name for [`PartitionKeyConfig`].
pub const PARTITION_KEY: &str = "partition_key";

/// Rule name for [`RepoBoundariesConfig`].
pub const REPO_BOUNDARIES: &str = "repo_boundaries";

/// Every rule name a policy may configure.
pub const KNOWN_RULES: &[&str] = &[PARTITION_KEY, REPO_BOUNDARIES];

/// Default file selection when a policy lists no include globs.
pub const DEFAULT_INCLUDE_GLOB: &str = "**/*.py";

/// A fully materialized validation policy.
///
/// `extends` is a load-time directive; a policy returned by
/// [`load_policy`](super::load_policy) always has it cleared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Policy {
    pub policy_id: String,
    pub policy_version: PolicyVersion,
    pub repo_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<PathBuf>,
    pub discovery: DiscoveryConfig,
    pub rules: BTreeMap<String, RuleConfig>,
}

/// Semantic version of a policy document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl std::fmt::Display for PolicyVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which files under the repository root are scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
}

impl DiscoveryConfig {
    /// Include globs, falling back to [`DEFAULT_INCLUDE_GLOB`] when none are set.
    pub fn effective_includes(&self) -> Vec<String> {
        if self.include_globs.is_empty() {
            vec![DEFAULT_INCLUDE_GLOB.to_string()]
        } else {
            self.include_globs.clone()
        }
    }

    fn validate(&self, source: &Path) -> Result<()> {
        for glob in self.include_globs.iter().chain(&self.exclude_globs) {
            Glob::new(glob).map_err(|e| {
                PolicyError::parse(source, format!("invalid discovery glob {glob:?}: {e}"))
            })?;
        }
        Ok(())
    }
}

/// Configuration for one built-in rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RuleConfig {
    PartitionKey(PartitionKeyConfig),
    RepoBoundaries(RepoBoundariesConfig),
}

impl RuleConfig {
    /// Parse the configuration of the rule called `name`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for unknown rule names, unknown or mistyped
    /// fields, and patterns that do not compile.
    pub fn from_value(name: &str, value: serde_yaml::Value) -> Result<Self> {
        // `partition_key:` with no body means "all defaults"
        let value = if value.is_null() {
            serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
        } else {
            value
        };

        let shape_error =
            |e: serde_yaml::Error| PolicyError::invalid(format!("rule '{}': {}", name, e));

        let config = match name {
            PARTITION_KEY => {
                RuleConfig::PartitionKey(serde_yaml::from_value(value).map_err(shape_error)?)
            }
            REPO_BOUNDARIES => {
                RuleConfig::RepoBoundaries(serde_yaml::from_value(value).map_err(shape_error)?)
            }
            other => {
                return Err(PolicyError::invalid(format!(
                    "unknown rule '{}' (known rules: {})",
                    other,
                    KNOWN_RULES.join(", ")
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// The policy key this configuration belongs under.
    pub fn name(&self) -> &'static str {
        match self {
            RuleConfig::PartitionKey(_) => PARTITION_KEY,
            RuleConfig::RepoBoundaries(_) => REPO_BOUNDARIES,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            RuleConfig::PartitionKey(c) => c.enabled,
            RuleConfig::RepoBoundaries(c) => c.enabled,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RuleConfig::PartitionKey(c) => c.severity,
            RuleConfig::RepoBoundaries(c) => c.severity,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            RuleConfig::PartitionKey(c) => {
                Regex::new(&c.topic_config_pattern).map_err(|e| {
                    PolicyError::invalid(format!(
                        "rule '{}': invalid topic_config_pattern {:?}: {}",
                        PARTITION_KEY, c.topic_config_pattern, e
                    ))
                })?;
                Ok(())
            }
            RuleConfig::RepoBoundaries(c) => {
                if let Some(prefix) = c.ownership.keys().find(|p| p.is_empty()) {
                    return Err(PolicyError::invalid(format!(
                        "rule '{}': ownership prefix {:?} must not be empty",
                        REPO_BOUNDARIES, prefix
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Requires topic configuration classes to declare a `partition_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionKeyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    #[serde(default = "default_true")]
    pub require_partition_key: bool,
    #[serde(default)]
    pub allowed_strategies: Vec<String>,
    #[serde(default = "default_topic_config_pattern")]
    pub topic_config_pattern: String,
}

impl Default for PartitionKeyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: default_severity(),
            require_partition_key: true,
            allowed_strategies: Vec::new(),
            topic_config_pattern: default_topic_config_pattern(),
        }
    }
}

/// Restricts imports that cross repository ownership boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoBoundariesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    /// Module prefix → owning repository id.
    #[serde(default)]
    pub ownership: BTreeMap<String, String>,
    #[serde(default)]
    pub forbidden_import_prefixes: Vec<String>,
    #[serde(default)]
    pub allowed_cross_repo_prefixes: Vec<String>,
}

impl Default for RepoBoundariesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: default_severity(),
            ownership: BTreeMap::new(),
            forbidden_import_prefixes: Vec::new(),
            allowed_cross_repo_prefixes: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_severity() -> Severity {
    Severity::Error
}

fn default_topic_config_pattern() -> String {
    "TopicConfig$".to_string()
}

/// Top-level document shape before rule configs are resolved.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicy {
    policy_id: String,
    policy_version: PolicyVersion,
    repo_id: String,
    #[serde(default)]
    extends: Option<PathBuf>,
    #[serde(default)]
    discovery: DiscoveryConfig,
    #[serde(default)]
    rules: serde_yaml::Mapping,
}

impl Policy {
    /// Materialize a policy from an already-merged YAML document.
    ///
    /// `source` is only used for error messages.
    pub fn from_value(value: serde_yaml::Value, source: &Path) -> Result<Self> {
        let raw: RawPolicy = serde_yaml::from_value(value)
            .map_err(|e| PolicyError::parse(source, e.to_string()))?;

        raw.discovery.validate(source)?;

        let mut rules = BTreeMap::new();
        for (key, value) in raw.rules {
            let name = key.as_str().ok_or_else(|| {
                PolicyError::parse(source, format!("rule names must be strings, got {key:?}"))
            })?;
            let config = RuleConfig::from_value(name, value)?;
            rules.insert(name.to_string(), config);
        }

        Ok(Policy {
            policy_id: raw.policy_id,
            policy_version: raw.policy_version,
            repo_id: raw.repo_id,
            extends: raw.extends,
            discovery: raw.discovery,
            rules,
        })
    }

    pub fn partition_key(&self) -> Option<&PartitionKeyConfig> {
        match self.rules.get(PARTITION_KEY) {
            Some(RuleConfig::PartitionKey(c)) => Some(c),
            _ => None,
        }
    }

    pub fn repo_boundaries(&self) -> Option<&RepoBoundariesConfig> {
        match self.rules.get(REPO_BOUNDARIES) {
            Some(RuleConfig::RepoBoundaries(c)) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> serde_yaml::Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn parses_minimal_policy() {
        let policy = Policy::from_value(
            yaml(
                r#"
policy_id: core
policy_version: {major: 1, minor: 2, patch: 3}
repo_id: core_repo
"#,
            ),
            Path::new("policy.yaml"),
        )
        .unwrap();

        assert_eq!(policy.policy_id, "core");
        assert_eq!(policy.policy_version.to_string(), "1.2.3");
        assert!(policy.rules.is_empty());
        assert!(policy.discovery.include_globs.is_empty());
    }

    #[test]
    fn rule_defaults_apply_for_empty_body() {
        let config = RuleConfig::from_value(PARTITION_KEY, serde_yaml::Value::Null).unwrap();
        assert_eq!(config, RuleConfig::PartitionKey(PartitionKeyConfig::default()));
        assert!(config.enabled());
        assert_eq!(config.severity(), Severity::Error);
    }

    #[test]
    fn unknown_rule_is_rejected() {
        let err = RuleConfig::from_value("naming", yaml("enabled: true")).unwrap_err();
        assert!(matches!(err, PolicyError::ValidationError { .. }));
        assert!(err.to_string().contains("naming"));
    }

    #[test]
    fn unknown_rule_field_is_rejected() {
        let err = RuleConfig::from_value(REPO_BOUNDARIES, yaml("owners: {}")).unwrap_err();
        assert!(matches!(err, PolicyError::ValidationError { .. }));
        assert!(err.to_string().contains(REPO_BOUNDARIES));
    }

    #[test]
    fn invalid_topic_pattern_is_rejected() {
        let err =
            RuleConfig::from_value(PARTITION_KEY, yaml("topic_config_pattern: '(unclosed'"))
                .unwrap_err();
        assert!(err.to_string().contains("topic_config_pattern"));
    }

    #[test]
    fn empty_ownership_prefix_is_rejected() {
        let err = RuleConfig::from_value(REPO_BOUNDARIES, yaml("ownership: {'': other}"))
            .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn invalid_glob_is_a_parse_error() {
        let err = Policy::from_value(
            yaml(
                r#"
policy_id: p
policy_version: {major: 1, minor: 0, patch: 0}
repo_id: r
discovery:
  include_globs: ["src/[a"]
"#,
            ),
            Path::new("policy.yaml"),
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::ConfigParseError { .. }));
    }

    #[test]
    fn missing_repo_id_is_a_parse_error() {
        let err = Policy::from_value(
            yaml("policy_id: p\npolicy_version: {major: 1, minor: 0, patch: 0}"),
            Path::new("policy.yaml"),
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::ConfigParseError { .. }));
        assert!(err.to_string().contains("repo_id"));
    }

    #[test]
    fn effective_includes_defaults_to_python_files() {
        let discovery = DiscoveryConfig::default();
        assert_eq!(discovery.effective_includes(), vec!["**/*.py".to_string()]);
    }

    #[test]
    fn typed_accessors_find_rule_configs() {
        let policy = Policy::from_value(
            yaml(
                r#"
policy_id: p
policy_version: {major: 1, minor: 0, patch: 0}
repo_id: r
rules:
  repo_boundaries:
    forbidden_import_prefixes: [internal.]
"#,
            ),
            Path::new("policy.yaml"),
        )
        .unwrap();

        assert!(policy.partition_key().is_none());
        let boundaries = policy.repo_boundaries().unwrap();
        assert_eq!(boundaries.forbidden_import_prefixes, vec!["internal."]);
    }
}
