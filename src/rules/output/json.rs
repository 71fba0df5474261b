//! JSON output formatter.
//!
//! Formats issues as machine-readable JSON for tooling integration.

use std::io::Write;

use serde::Serialize;

use super::IssueFormatter;
use crate::rules::{Issue, IssueSummary};

/// Formats issues as JSON.
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    issues: &'a [Issue],
    summary: IssueSummary,
}

impl JsonFormatter {
    /// Create a new JSON formatter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueFormatter for JsonFormatter {
    fn format<W: Write>(&self, issues: &[Issue], writer: &mut W) -> std::io::Result<()> {
        let output = JsonOutput {
            issues,
            summary: IssueSummary::from_issues(issues),
        };

        serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::other)?;
        writeln!(writer)
    }
}
