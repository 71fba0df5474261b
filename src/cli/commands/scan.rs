//! Scan command implementation.
//!
//! The `xrepo-validate scan` command prints the import graph the rules would
//! see, as JSON, for diagnosing discovery globs and parse failures.

use std::io::Write;

use serde::Serialize;

use crate::cli::args::ScanArgs;
use crate::error::Result;
use crate::policy::load_policy;
use crate::scan::{relative_path, ImportGraphScanner, ImportedModule};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The scan command implementation.
pub struct ScanCommand {
    context: CommandContext,
    args: ScanArgs,
}

#[derive(Serialize)]
struct ScannedFile<'a> {
    file: String,
    imports: &'a [ImportedModule],
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_error: Option<&'a str>,
}

impl ScanCommand {
    /// Create a new scan command.
    pub fn new(context: CommandContext, args: ScanArgs) -> Self {
        Self { context, args }
    }
}

impl Command for ScanCommand {
    fn execute(&self, mut out: &mut dyn Write) -> Result<CommandResult> {
        let policy = load_policy(&self.context.resolved_policy_path())?;
        let root = &self.context.root;
        let graph = ImportGraphScanner::new().build(root, &policy.discovery)?;

        let files: Vec<ScannedFile<'_>> = graph
            .iter()
            .filter(|(_, f)| !self.args.errors_only || !f.is_parsed())
            .map(|(path, f)| ScannedFile {
                file: relative_path(root, path),
                imports: &f.imports,
                parse_error: f.parse_error.as_deref(),
            })
            .collect();

        serde_json::to_writer_pretty(&mut out, &files).map_err(anyhow::Error::from)?;
        writeln!(out)?;
        Ok(CommandResult::success())
    }
}
