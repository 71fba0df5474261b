//! Built-in rules.
//!
//! The rule set is closed: every [`RuleConfig`] variant maps to exactly one
//! rule here.

pub mod partition_key;
pub mod repo_boundaries;

pub use partition_key::{
    PartitionKeyForm, RulePartitionKey, CONTEXT_CLASS_NAME, MISSING_PARTITION_KEY,
};
pub use repo_boundaries::{RuleRepoBoundaries, FORBIDDEN_IMPORT, REPO_BOUNDARY_VIOLATION};

use crate::error::Result;
use crate::policy::RuleConfig;

use super::Rule;

/// Instantiate the rule a configuration belongs to.
pub fn build_rule(config: &RuleConfig) -> Result<Box<dyn Rule>> {
    Ok(match config {
        RuleConfig::PartitionKey(c) => Box::new(RulePartitionKey::new(c.clone())?),
        RuleConfig::RepoBoundaries(c) => Box::new(RuleRepoBoundaries::new(c.clone())),
    })
}
