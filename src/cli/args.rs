//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::rules::{OutputFormat, Severity};

/// Policy file used when neither `--policy` nor `XREPO_POLICY` is given.
pub const DEFAULT_POLICY_FILE: &str = "xrepo-policy.yaml";

/// xrepo-validate - Cross-repository policy validation.
#[derive(Debug, Parser)]
#[command(name = "xrepo-validate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the policy file
    #[arg(short, long, global = true, env = "XREPO_POLICY", default_value = DEFAULT_POLICY_FILE)]
    pub policy: PathBuf,

    /// Repository root to scan (defaults to the current directory)
    #[arg(short, long, global = true, env = "XREPO_ROOT")]
    pub root: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the repository against the policy
    Check(CheckArgs),

    /// Print the policy after inheritance is resolved
    ShowPolicy(ShowPolicyArgs),

    /// Print the import graph of the repository
    Scan(ScanArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Lowest severity that fails the run: info, warning, error, critical
    #[arg(long, default_value = "error")]
    pub fail_on: Severity,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            fail_on: Severity::Error,
        }
    }
}

/// Arguments for the `show-policy` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ShowPolicyArgs {
    /// Output as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `scan` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ScanArgs {
    /// Only list files that could not be parsed
    #[arg(long)]
    pub errors_only: bool,
}
