//! Policy loading, inheritance and schema.
//!
//! This module handles all aspects of the policy document:
//! - Schema definitions in [`schema`]
//! - File loading in [`loader`]
//! - Single-parent inheritance in [`extends`]
//! - Parent/child merging in [`merger`]
//!
//! # Example
//!
//! ```
//! use xrepo_validate::policy::load_policy;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("base.yaml"), r#"
//! policy_id: base
//! policy_version: {major: 1, minor: 0, patch: 0}
//! repo_id: base_repo
//! rules:
//!   repo_boundaries:
//!     forbidden_import_prefixes: [internal.private]
//! "#).unwrap();
//! fs::write(temp.path().join("app.yaml"), r#"
//! extends: ./base.yaml
//! repo_id: my_app
//! rules:
//!   repo_boundaries:
//!     forbidden_import_prefixes: [internal_module]
//! "#).unwrap();
//!
//! let policy = load_policy(&temp.path().join("app.yaml")).unwrap();
//! assert_eq!(policy.repo_id, "my_app");
//! assert_eq!(
//!     policy.repo_boundaries().unwrap().forbidden_import_prefixes,
//!     vec!["internal.private", "internal_module"]
//! );
//! ```

pub mod extends;
pub mod loader;
pub mod merger;
pub mod schema;

pub use extends::{resolve_parent_path, ExtendsResolver};
pub use loader::{load_policy, load_policy_value, parse_policy, parse_policy_value};
pub use merger::{merge_policy_documents, merge_values};
pub use schema::{
    DiscoveryConfig, PartitionKeyConfig, Policy, PolicyVersion, RepoBoundariesConfig, RuleConfig,
    KNOWN_RULES, PARTITION_KEY, REPO_BOUNDARIES,
};
