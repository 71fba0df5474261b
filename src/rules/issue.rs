//! Issues reported by rules.
//!
//! An [`Issue`] is the engine's only output contract. Formatting and baseline
//! suppression are left to reporters.

use std::collections::BTreeMap;

use serde::Serialize;

use super::fingerprint::{fingerprint, Anchor};
use super::rule::Severity;

/// Context key holding the issue fingerprint.
pub const CONTEXT_FINGERPRINT: &str = "fingerprint";

/// Context key holding the symbol an issue is about.
pub const CONTEXT_SYMBOL: &str = "symbol";

/// A problem found by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Machine-readable issue code (e.g. `MISSING_PARTITION_KEY`).
    pub code: String,
    pub severity: Severity,
    pub message: String,
    /// Root-relative, `/`-separated path.
    pub file: String,
    /// 1-indexed line.
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Always contains `fingerprint`; `symbol` where applicable.
    pub context: BTreeMap<String, String>,
}

impl Issue {
    /// Create an issue anchored to its line.
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
    ) -> Self {
        let code = code.into();
        let file = file.into();
        let mut context = BTreeMap::new();
        context.insert(
            CONTEXT_FINGERPRINT.to_string(),
            fingerprint(&code, &file, Anchor::Line(line)),
        );

        Self {
            code,
            severity,
            message: message.into(),
            file,
            line,
            column: None,
            suggestion: None,
            context,
        }
    }

    /// Anchor this issue to a named symbol, recomputing its fingerprint.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        self.context.insert(
            CONTEXT_FINGERPRINT.to_string(),
            fingerprint(&self.code, &self.file, Anchor::Symbol(&symbol)),
        );
        self.context.insert(CONTEXT_SYMBOL.to_string(), symbol);
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Add a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach extra context. The fingerprint key cannot be overwritten this way.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if key != CONTEXT_FINGERPRINT {
            self.context.insert(key, value.into());
        }
        self
    }

    pub fn fingerprint(&self) -> &str {
        self.context
            .get(CONTEXT_FINGERPRINT)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn symbol(&self) -> Option<&str> {
        self.context.get(CONTEXT_SYMBOL).map(String::as_str)
    }
}

/// Sort issues by `(file, line, code)`, then column and message so equal
/// keys still come out in a reproducible order.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(|a, b| {
        (&a.file, a.line, &a.code, a.column, &a.message).cmp(&(
            &b.file, b.line, &b.code, b.column, &b.message,
        ))
    });
}

/// Issue counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub total: usize,
    pub critical: usize,
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl IssueSummary {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Self {
            total: issues.len(),
            ..Self::default()
        };
        for issue in issues {
            match issue.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Error => summary.error += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Info => summary.info += 1,
            }
        }
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }
}
