//! Policy inheritance resolution.
//!
//! A policy may name a single parent through `extends:`. Inheritance is
//! bounded at one hop: a parent that itself extends another policy is
//! rejected, which rules out cycles and ambiguous deep-merge ordering.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use super::loader::load_policy_value;
use super::merger::{merge_policy_documents, EXTENDS_KEY};
use crate::error::{PolicyError, Result};

/// Resolves the `extends:` directive of a raw policy document.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use xrepo_validate::policy::{load_policy_value, ExtendsResolver};
///
/// let path = Path::new("policies/app.yaml");
/// let raw = load_policy_value(path).unwrap();
/// let merged = ExtendsResolver::new().resolve(raw, path).unwrap();
/// assert!(merged.get("extends").is_none());
/// ```
pub struct ExtendsResolver {
    max_depth: usize,
}

impl ExtendsResolver {
    /// Create a resolver allowing a single parent.
    pub fn new() -> Self {
        Self { max_depth: 1 }
    }

    /// Get the maximum inheritance depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolve the parent of `document` (loaded from `source`) and merge it in.
    ///
    /// Documents without `extends` are returned unchanged.
    pub fn resolve(&self, document: Value, source: &Path) -> Result<Value> {
        let Some(target) = extends_target(&document, source)? else {
            return Ok(document);
        };

        let parent_path = resolve_parent_path(source, &target);
        if !parent_path.exists() {
            return Err(PolicyError::FileNotFound { path: parent_path });
        }

        debug!(
            "Policy {} extends {}",
            source.display(),
            parent_path.display()
        );

        let parent = load_policy_value(&parent_path)?;
        if extends_target(&parent, &parent_path)?.is_some() {
            return Err(PolicyError::parse(
                &parent_path,
                format!(
                    "multi-level policy inheritance is not supported: {} is extended by {} \
                     and extends another policy itself (maximum depth is {})",
                    parent_path.display(),
                    source.display(),
                    self.max_depth
                ),
            ));
        }

        Ok(merge_policy_documents(&parent, &document))
    }
}

impl Default for ExtendsResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve an `extends` target against the directory of the extending file.
///
/// Absolute targets are returned as-is.
pub fn resolve_parent_path(source: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }
    let base = source.parent().unwrap_or_else(|| Path::new(""));
    base.join(target)
}

fn extends_target(document: &Value, source: &Path) -> Result<Option<PathBuf>> {
    match document.get(EXTENDS_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Err(PolicyError::parse(
            source,
            "extends must name a policy file, got an empty string",
        )),
        Some(Value::String(s)) => Ok(Some(PathBuf::from(s))),
        Some(other) => Err(PolicyError::parse(
            source,
            format!("extends must be a path string, got {other:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn resolver_max_depth_is_one() {
        assert_eq!(ExtendsResolver::new().max_depth(), 1);
    }

    #[test]
    fn document_without_extends_unchanged() {
        let doc = yaml("policy_id: a\nrepo_id: r");
        let resolved = ExtendsResolver::new()
            .resolve(doc.clone(), Path::new("policy.yaml"))
            .unwrap();
        assert_eq!(resolved, doc);
    }

    #[test]
    fn null_extends_is_ignored() {
        let doc = yaml("policy_id: a\nextends: null");
        let resolved = ExtendsResolver::new()
            .resolve(doc.clone(), Path::new("policy.yaml"))
            .unwrap();
        assert_eq!(resolved, doc);
    }

    #[test]
    fn relative_parent_resolves_against_source_dir() {
        let path = resolve_parent_path(Path::new("/repo/policies/app.yaml"), Path::new("./base.yaml"));
        assert_eq!(path, PathBuf::from("/repo/policies/./base.yaml"));

        let path = resolve_parent_path(Path::new("/repo/policies/app.yaml"), Path::new("../base.yaml"));
        assert_eq!(path, PathBuf::from("/repo/policies/../base.yaml"));
    }

    #[test]
    fn absolute_parent_is_kept() {
        let path = resolve_parent_path(Path::new("/repo/app.yaml"), Path::new("/etc/base.yaml"));
        assert_eq!(path, PathBuf::from("/etc/base.yaml"));
    }

    #[test]
    fn missing_parent_is_file_not_found() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("app.yaml");
        let err = ExtendsResolver::new()
            .resolve(yaml("extends: ./nope.yaml"), &source)
            .unwrap_err();

        match err {
            PolicyError::FileNotFound { path } => assert!(path.ends_with("nope.yaml")),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn grandparent_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("base.yaml"), "extends: ./root.yaml\n").unwrap();
        let source = temp.path().join("app.yaml");

        let err = ExtendsResolver::new()
            .resolve(yaml("extends: ./base.yaml"), &source)
            .unwrap_err();

        assert!(matches!(err, PolicyError::ConfigParseError { .. }));
        let msg = err.to_string();
        assert!(msg.contains("multi-level"));
        assert!(msg.contains("not supported"));
    }

    #[test]
    fn non_string_extends_is_rejected() {
        let err = ExtendsResolver::new()
            .resolve(yaml("extends: [a.yaml, b.yaml]"), Path::new("policy.yaml"))
            .unwrap_err();
        assert!(matches!(err, PolicyError::ConfigParseError { .. }));
    }

    #[test]
    fn parent_with_null_extends_is_a_single_hop() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("base.yaml"),
            "extends: null\npolicy_id: base\nrepo_id: base_repo\n",
        )
        .unwrap();
        let source = temp.path().join("app.yaml");

        let merged = ExtendsResolver::new()
            .resolve(yaml("extends: ./base.yaml\nrepo_id: app"), &source)
            .unwrap();

        assert!(merged.get(EXTENDS_KEY).is_none());
        assert_eq!(merged["policy_id"], "base");
        assert_eq!(merged["repo_id"], "app");
    }
}
