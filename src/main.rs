//! xrepo-validate CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xrepo_validate::cli::{resolve_root, Cli, CommandContext, CommandDispatcher};

/// Exit code for configuration errors (bad policy, missing files).
const EXIT_CONFIG_ERROR: u8 = 2;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so JSON output on stdout stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("xrepo_validate=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xrepo_validate=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("xrepo-validate starting with args: {:?}", cli);

    let use_color = !cli.no_color && console::colors_enabled();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let outcome = resolve_root(cli.root.clone(), std::env::current_dir).and_then(|root| {
        let context = CommandContext::new(&cli.policy, root).with_color(use_color);
        CommandDispatcher::new(context).dispatch(&cli, &mut out)
    });

    let code = match outcome {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            let style = console::Style::new().red().bold().force_styling(use_color);
            eprintln!("{} [{}]: {}", style.apply_to("Error"), e.code(), e);
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    };
    let _ = out.flush();
    code
}
