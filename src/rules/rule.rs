//! Rule definitions.
//!
//! This module provides the core trait and types for defining rules:
//!
//! - [`Rule`] - The trait that all rules implement
//! - [`Severity`] - Severity level for issues (Info, Warning, Error, Critical)

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::issue::Issue;
use crate::scan::ImportGraph;

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, never fails a run on its own.
    Info,
    /// Should be addressed.
    Warning,
    /// Violates the policy.
    Error,
    /// Violates the policy in a way that must block the change.
    Critical,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(format!(
                "unknown severity '{}' (expected info, warning, error or critical)",
                other
            )),
        }
    }
}

/// A rule that validates a scanned source tree.
///
/// Every rule returns an empty list when disabled without doing any work,
/// skips files whose [`FileImports`](crate::scan::FileImports) carry a
/// `parse_error`, and returns its issues sorted by `(file, line, code)`.
pub trait Rule: Send + Sync {
    /// Policy key of this rule (e.g. `partition_key`).
    fn name(&self) -> &'static str;

    /// Description of what this rule checks.
    fn description(&self) -> &str;

    /// Whether the rule's configuration enables it.
    fn enabled(&self) -> bool;

    /// Severity attached to issues this rule produces.
    fn severity(&self) -> Severity;

    /// Check the scanned files and return any issues.
    fn validate(&self, graph: &ImportGraph, repo_id: &str, repo_root: &Path) -> Vec<Issue>;
}
