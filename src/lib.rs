//! xrepo-validate - Cross-repository policy validation.
//!
//! Loads a YAML validation policy (with one level of `extends`
//! inheritance), scans a Python source tree for imports and class
//! definitions, and runs the configured rules to produce issues with
//! stable fingerprints for baseline suppression.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`engine`] - Policy-driven validation runs and reports
//! - [`error`] - Error types and result aliases
//! - [`policy`] - Policy loading, inheritance and schema
//! - [`rules`] - Rules, issues, fingerprints and output formatters
//! - [`scan`] - File discovery and import graph construction
//! - [`validators`] - Thread-safe validator registry
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use xrepo_validate::engine::ValidationEngine;
//! use xrepo_validate::policy::parse_policy;
//!
//! let policy = parse_policy(
//!     "policy_id: demo\npolicy_version: {major: 1, minor: 0, patch: 0}\nrepo_id: demo\n",
//!     Path::new("policy.yaml"),
//! )
//! .unwrap();
//! let engine = ValidationEngine::from_policy(policy).unwrap();
//! assert!(engine.rules().is_empty());
//! ```
//!
//! For file-based runs, see the integration tests.

pub mod cli;
pub mod engine;
pub mod error;
pub mod policy;
pub mod rules;
pub mod scan;
pub mod validators;

pub use error::{PolicyError, Result};
