//! Policy file loading.
//!
//! This module reads policy documents from disk, resolves their parent
//! through [`ExtendsResolver`] and materializes the merged [`Policy`].

use std::fs;
use std::path::Path;

use tracing::debug;

use super::extends::ExtendsResolver;
use super::schema::Policy;
use crate::error::{PolicyError, Result};

/// Load a policy file, merge its parent (if any) and validate the result.
///
/// # Errors
///
/// Returns `FileNotFound` if the file or its `extends` target doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid or inheritance is deeper
/// than one level.
/// Returns `ValidationError` if a rule configuration is malformed.
pub fn load_policy(path: &Path) -> Result<Policy> {
    let document = load_policy_value(path)?;
    let merged = ExtendsResolver::new().resolve(document, path)?;
    let policy = Policy::from_value(merged, path)?;

    debug!(
        "Loaded policy {} v{} for repo {} ({} rule(s))",
        policy.policy_id,
        policy.policy_version,
        policy.repo_id,
        policy.rules.len()
    );

    Ok(policy)
}

/// Load a policy file as a raw YAML value, without resolving `extends`.
pub fn load_policy_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PolicyError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PolicyError::Io(e)
        }
    })?;

    parse_policy_value(&content, path)
}

/// Parse YAML content into a raw value.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_policy_value(content: &str, source_path: &Path) -> Result<serde_yaml::Value> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| PolicyError::parse(source_path, e.to_string()))?;

    if !value.is_mapping() {
        return Err(PolicyError::parse(
            source_path,
            "policy document must be a mapping",
        ));
    }

    Ok(value)
}

/// Parse a policy from YAML text that does not use `extends`.
pub fn parse_policy(content: &str, source_path: &Path) -> Result<Policy> {
    let value = parse_policy_value(content, source_path)?;
    if value.get(super::merger::EXTENDS_KEY).is_some() {
        return Err(PolicyError::parse(
            source_path,
            "extends requires loading the policy from a file",
        ));
    }
    Policy::from_value(value, source_path)
}
