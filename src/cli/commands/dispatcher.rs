//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::{PolicyError, Result};

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing its report to `out`.
    ///
    /// Configuration errors are returned as `Err`; findings are reported
    /// through the [`CommandResult`] exit code.
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Shared settings every command needs.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub policy_path: PathBuf,
    pub root: PathBuf,
    pub use_color: bool,
}

impl CommandContext {
    pub fn new(policy_path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            policy_path: policy_path.into(),
            root: root.into(),
            use_color: false,
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Policy path, relative paths taken from the repository root when
    /// they do not exist from the working directory.
    pub fn resolved_policy_path(&self) -> PathBuf {
        if self.policy_path.is_absolute() || self.policy_path.exists() {
            self.policy_path.clone()
        } else {
            self.root.join(&self.policy_path)
        }
    }
}

/// Repository root to scan: `explicit` when given, else `current_dir()`.
///
/// # Errors
///
/// Returns `Io` when no root is given and the working directory cannot be
/// read (for example, it was deleted).
pub fn resolve_root(
    explicit: Option<PathBuf>,
    current_dir: impl FnOnce() -> std::io::Result<PathBuf>,
) -> Result<PathBuf> {
    match explicit {
        Some(root) => Ok(root),
        None => current_dir().map_err(|e| {
            PolicyError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot determine the current directory ({e}); pass --root"),
            ))
        }),
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Get the repository root path.
    pub fn root(&self) -> &Path {
        &self.context.root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        match &cli.command {
            Commands::Check(args) => {
                let cmd = super::check::CheckCommand::new(self.context.clone(), args.clone());
                cmd.execute(out)
            }
            Commands::ShowPolicy(args) => {
                let cmd =
                    super::show_policy::ShowPolicyCommand::new(self.context.clone(), args.clone());
                cmd.execute(out)
            }
            Commands::Scan(args) => {
                let cmd = super::scan::ScanCommand::new(self.context.clone(), args.clone());
                cmd.execute(out)
            }
        }
    }
}
