//! Parent/child merge algorithm for policy documents.
//!
//! A child policy that `extends` a parent is layered on top of it field by
//! field. The merge operates on raw YAML values so that rule configurations
//! the child never mentions survive untouched.
//!
//! # Merge Rules
//!
//! - Mappings are merged by key, recursively; child keys win
//! - Sequences are concatenated, parent first, without deduplication
//! - Scalars in the child replace scalars in the parent
//! - A null child value keeps the parent value
//! - Identity keys (`policy_id`, `repo_id`, `policy_version`) are replaced
//!   wholesale by the child, never merged field by field
//! - The top-level `extends` key is dropped from the result

use serde_yaml::Value;

/// Key holding the inheritance directive.
pub const EXTENDS_KEY: &str = "extends";

/// Top-level keys the child replaces as a whole when it sets them.
pub const REPLACED_KEYS: [&str; 3] = ["policy_id", "repo_id", "policy_version"];

/// Merge two YAML values with child precedence.
///
/// # Arguments
///
/// * `parent` - The inherited document
/// * `child` - The extending document (takes precedence)
pub fn merge_values(parent: &Value, child: &Value) -> Value {
    match (parent, child) {
        (Value::Mapping(parent_map), Value::Mapping(child_map)) => {
            let mut result = parent_map.clone();

            for (key, child_value) in child_map {
                if child_value.is_null() {
                    if !result.contains_key(key) {
                        result.insert(key.clone(), Value::Null);
                    }
                    continue;
                }

                let merged = match parent_map.get(key) {
                    Some(parent_value) => merge_values(parent_value, child_value),
                    None => child_value.clone(),
                };
                result.insert(key.clone(), merged);
            }

            Value::Mapping(result)
        }

        (Value::Sequence(parent_seq), Value::Sequence(child_seq)) => {
            let mut result = parent_seq.clone();
            result.extend(child_seq.iter().cloned());
            Value::Sequence(result)
        }

        (parent, Value::Null) => parent.clone(),

        (_, child) => child.clone(),
    }
}

/// Merge a parent policy document with its child and drop `extends`.
pub fn merge_policy_documents(parent: &Value, child: &Value) -> Value {
    let mut merged = merge_values(parent, child);
    if let Value::Mapping(map) = &mut merged {
        for key in REPLACED_KEYS {
            if let Some(value) = child.get(key).filter(|v| !v.is_null()) {
                map.insert(Value::from(key), value.clone());
            }
        }
        map.remove(EXTENDS_KEY);
    }
    merged
}
