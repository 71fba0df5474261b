//! Command-line interface for xrepo-validate.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, ScanArgs, ShowPolicyArgs, DEFAULT_POLICY_FILE};
pub use commands::{resolve_root, Command, CommandContext, CommandDispatcher, CommandResult};
