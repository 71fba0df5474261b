//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations:
//! - `check` - validate a repository and report issues
//! - `show-policy` - print the merged policy
//! - `scan` - print the import graph

pub mod check;
pub mod dispatcher;
pub mod scan;
pub mod show_policy;

pub use dispatcher::{resolve_root, Command, CommandContext, CommandDispatcher, CommandResult};
