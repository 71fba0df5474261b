//! Rules and the issues they report.
//!
//! # Overview
//!
//! - **Rules** - checks run against an import graph ([`Rule`] trait)
//! - **Rule set** - the rules a policy configures ([`RuleSet`])
//! - **Issues** - findings with a stable fingerprint ([`Issue`])
//! - **Output** - human and JSON formatters ([`IssueFormatter`])
//!
//! # Example
//!
//! ```
//! use xrepo_validate::rules::{Issue, Severity};
//!
//! let issue = Issue::new("MISSING_PARTITION_KEY", Severity::Error, "no key", "topics.py", 3)
//!     .with_symbol("OrdersTopicConfig");
//!
//! assert_eq!(issue.fingerprint().len(), 32);
//! assert!(Severity::Warning < Severity::Error);
//! ```

pub mod builtin;
pub mod fingerprint;
pub mod issue;
pub mod output;
pub mod registry;
pub mod rule;

pub use builtin::{
    build_rule, PartitionKeyForm, RulePartitionKey, RuleRepoBoundaries, CONTEXT_CLASS_NAME,
    FORBIDDEN_IMPORT, MISSING_PARTITION_KEY, REPO_BOUNDARY_VIOLATION,
};
pub use fingerprint::{fingerprint, Anchor, FINGERPRINT_LEN};
pub use issue::{sort_issues, Issue, IssueSummary, CONTEXT_FINGERPRINT, CONTEXT_SYMBOL};
pub use output::{HumanFormatter, IssueFormatter, JsonFormatter, OutputFormat};
pub use registry::RuleSet;
pub use rule::{Rule, Severity};
