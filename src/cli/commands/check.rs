//! Check command implementation.
//!
//! The `xrepo-validate check` command loads the policy, scans the repository
//! and reports every issue found by the enabled rules.

use std::io::Write;

use tracing::warn;

use crate::cli::args::CheckArgs;
use crate::engine::{Report, ValidationEngine};
use crate::error::Result;
use crate::policy::load_policy;
use crate::rules::{HumanFormatter, IssueFormatter, JsonFormatter, OutputFormat};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Exit code when an issue reaches the `--fail-on` severity.
pub const EXIT_ISSUES: i32 = 1;

/// The check command implementation.
pub struct CheckCommand {
    context: CommandContext,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(context: CommandContext, args: CheckArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }

    fn write_report(&self, report: &Report, mut out: &mut dyn Write) -> std::io::Result<()> {
        match self.args.format {
            OutputFormat::Json => JsonFormatter::new().format(&report.issues, &mut out),
            OutputFormat::Human => {
                HumanFormatter::new(self.context.use_color).format(&report.issues, &mut out)?;
                if !report.parse_errors.is_empty() {
                    writeln!(
                        out,
                        "Skipped {} file(s) that could not be parsed:",
                        report.parse_errors.len()
                    )?;
                    for failure in &report.parse_errors {
                        writeln!(out, "  {}: {}", failure.file, failure.message)?;
                    }
                }
                if report.is_clean() {
                    writeln!(
                        out,
                        "No issues found in {} file(s) (policy {})",
                        report.files_scanned, report.policy_id
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let policy = load_policy(&self.context.resolved_policy_path())?;
        let engine = ValidationEngine::from_policy(policy)?;
        let report = engine.run(&self.context.root)?;

        for failure in &report.parse_errors {
            warn!("Could not parse {}: {}", failure.file, failure.message);
        }

        self.write_report(&report, out)?;

        if report.fails_at(self.args.fail_on) {
            Ok(CommandResult::failure(EXIT_ISSUES))
        } else {
            Ok(CommandResult::success())
        }
    }
}
