//! Human-readable output formatter.
//!
//! Formats issues for terminal display with optional color support.

use std::io::Write;

use console::Style;

use super::IssueFormatter;
use crate::rules::{Issue, IssueSummary, Severity};

/// Formats issues for human consumption.
pub struct HumanFormatter {
    /// Whether to use colors (ANSI escape codes).
    pub use_color: bool,
}

impl HumanFormatter {
    /// Create a new human formatter.
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn severity_style(&self, severity: Severity) -> Style {
        let style = match severity {
            Severity::Critical | Severity::Error => Style::new().red().bold(),
            Severity::Warning => Style::new().color256(208),
            Severity::Info => Style::new().magenta(),
        };
        style.force_styling(self.use_color)
    }

    fn dim(&self) -> Style {
        Style::new().dim().force_styling(self.use_color)
    }
}

impl IssueFormatter for HumanFormatter {
    fn format<W: Write>(&self, issues: &[Issue], writer: &mut W) -> std::io::Result<()> {
        let dim = self.dim();

        for issue in issues {
            // Header line: error[CODE]: message
            writeln!(
                writer,
                "{}: {}",
                self.severity_style(issue.severity)
                    .apply_to(format!("{}[{}]", issue.severity, issue.code)),
                issue.message
            )?;

            let location = match issue.column {
                Some(column) => format!("{}:{}:{}", issue.file, issue.line, column),
                None => format!("{}:{}", issue.file, issue.line),
            };
            writeln!(writer, "  {} {}", dim.apply_to("-->"), location)?;

            if let Some(ref suggestion) = issue.suggestion {
                writeln!(writer, "   = help: {}", suggestion)?;
            }
            writeln!(
                writer,
                "   {}",
                dim.apply_to(format!("= fingerprint: {}", issue.fingerprint()))
            )?;

            writeln!(writer)?;
        }

        let summary = IssueSummary::from_issues(issues);
        if summary.total > 0 {
            let parts: Vec<String> = Severity::ALL
                .iter()
                .rev()
                .filter(|s| summary.count(**s) > 0)
                .map(|s| format!("{} {}", summary.count(*s), s))
                .collect();
            writeln!(
                writer,
                "Found {} issue(s): {}",
                summary.total,
                parts.join(", ")
            )?;
        }

        Ok(())
    }
}
