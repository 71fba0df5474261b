//! Show-policy command implementation.
//!
//! The `xrepo-validate show-policy` command prints the policy after its
//! `extends` parent has been merged in, which is the only way to see the
//! effective rule configuration of an inheriting policy.

use std::io::Write;

use crate::cli::args::ShowPolicyArgs;
use crate::error::Result;
use crate::policy::load_policy;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The show-policy command implementation.
pub struct ShowPolicyCommand {
    context: CommandContext,
    args: ShowPolicyArgs,
}

impl ShowPolicyCommand {
    /// Create a new show-policy command.
    pub fn new(context: CommandContext, args: ShowPolicyArgs) -> Self {
        Self { context, args }
    }
}

impl Command for ShowPolicyCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let policy = load_policy(&self.context.resolved_policy_path())?;

        let rendered = if self.args.json {
            serde_json::to_string_pretty(&policy).map_err(anyhow::Error::from)?
        } else {
            serde_yaml::to_string(&policy).map_err(anyhow::Error::from)?
        };

        writeln!(out, "{}", rendered.trim_end())?;
        Ok(CommandResult::success())
    }
}
