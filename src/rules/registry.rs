//! The set of rules configured by a policy.
//!
//! A [`RuleSet`] holds one rule per configured rule name and runs them
//! against an [`ImportGraph`], returning one aggregated, sorted issue list.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use super::builtin::build_rule;
use super::issue::{sort_issues, Issue};
use super::rule::Rule;
use crate::error::Result;
use crate::policy::Policy;
use crate::scan::ImportGraph;

/// Rules keyed by their policy name.
pub struct RuleSet {
    rules: BTreeMap<&'static str, Box<dyn Rule>>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Build every rule configured in `policy`, enabled or not.
    pub fn from_policy(policy: &Policy) -> Result<Self> {
        let mut set = Self::new();
        for config in policy.rules.values() {
            set.register(build_rule(config)?);
        }
        Ok(set)
    }

    /// Add a rule, replacing any rule with the same name.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.insert(rule.name(), rule);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.get(name).map(|r| r.as_ref())
    }

    /// Iterate over rules in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.values().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every enabled rule and merge their issues in `(file, line, code)` order.
    pub fn run(&self, graph: &ImportGraph, repo_id: &str, repo_root: &Path) -> Vec<Issue> {
        let mut issues = Vec::new();
        for rule in self.iter() {
            if !rule.enabled() {
                debug!("Rule {} is disabled", rule.name());
                continue;
            }
            let found = rule.validate(graph, repo_id, repo_root);
            debug!("Rule {} reported {} issue(s)", rule.name(), found.len());
            issues.extend(found);
        }
        sort_issues(&mut issues);
        issues
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}
