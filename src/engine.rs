//! Policy-driven validation runs.
//!
//! A [`ValidationEngine`] ties a loaded [`Policy`] to its [`RuleSet`]: it
//! scans a repository root with the policy's discovery settings, runs every
//! enabled rule and returns a [`Report`].

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::policy::Policy;
use crate::rules::{sort_issues, Issue, IssueSummary, RuleSet, Severity};
use crate::scan::{relative_path, ImportGraph, ImportGraphScanner};

/// Result of one validation run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub policy_id: String,
    pub repo_id: String,
    pub files_scanned: usize,
    /// Root-relative paths of files that could not be parsed, with the reason.
    pub parse_errors: Vec<ParseFailure>,
    pub issues: Vec<Issue>,
    pub summary: IssueSummary,
}

/// A file skipped because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub file: String,
    pub message: String,
}

impl Report {
    /// Highest severity among the issues, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }

    /// Whether any issue is at or above `threshold`.
    pub fn fails_at(&self, threshold: Severity) -> bool {
        self.max_severity().is_some_and(|s| s >= threshold)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Runs a policy's rules against a source tree.
pub struct ValidationEngine {
    policy: Policy,
    rules: RuleSet,
    scanner: ImportGraphScanner,
}

impl ValidationEngine {
    /// Build the rule set configured by `policy`.
    pub fn from_policy(policy: Policy) -> Result<Self> {
        let rules = RuleSet::from_policy(&policy)?;
        Ok(Self {
            policy,
            rules,
            scanner: ImportGraphScanner::new(),
        })
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Scan `root` with the policy's discovery settings.
    pub fn scan(&self, root: &Path) -> Result<ImportGraph> {
        self.scanner.build(root, &self.policy.discovery)
    }

    /// Scan `root` and run every enabled rule.
    pub fn run(&self, root: &Path) -> Result<Report> {
        let graph = self.scan(root)?;
        Ok(self.check(&graph, root))
    }

    /// Run every enabled rule against an existing graph.
    pub fn check(&self, graph: &ImportGraph, root: &Path) -> Report {
        let mut issues = self.rules.run(graph, &self.policy.repo_id, root);
        sort_issues(&mut issues);

        let parse_errors: Vec<ParseFailure> = graph
            .iter()
            .filter_map(|(path, file)| {
                file.parse_error.as_ref().map(|message| ParseFailure {
                    file: relative_path(root, path),
                    message: message.clone(),
                })
            })
            .collect();

        let summary = IssueSummary::from_issues(&issues);
        info!(
            "Policy {} found {} issue(s) in {} file(s)",
            self.policy.policy_id,
            summary.total,
            graph.len()
        );

        Report {
            policy_id: self.policy.policy_id.clone(),
            repo_id: self.policy.repo_id.clone(),
            files_scanned: graph.len(),
            parse_errors,
            issues,
            summary,
        }
    }
}

/// Load the policy at `policy_path` and validate `root` with it.
pub fn validate_repository(policy_path: &Path, root: &Path) -> Result<Report> {
    let policy = crate::policy::load_policy(policy_path)?;
    ValidationEngine::from_policy(policy)?.run(root)
}
