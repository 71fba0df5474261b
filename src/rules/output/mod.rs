//! Issue output formatters.
//!
//! This module provides formatters for writing issues in different formats
//! (human-readable, JSON).

pub mod human;
pub mod json;

use std::io::Write;
use std::str::FromStr;

use crate::rules::Issue;

/// Output format for issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected human or json)", other)),
        }
    }
}

/// Trait for formatting issues.
pub trait IssueFormatter {
    /// Format issues to the given writer.
    fn format<W: Write>(&self, issues: &[Issue], writer: &mut W) -> std::io::Result<()>;
}

pub use human::HumanFormatter;
pub use json::JsonFormatter;
