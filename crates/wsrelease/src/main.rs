//! wsrelease CLI entry point.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use tracing::instrument;
use wsrelease::cli;
use wsrelease::commands::{self, Command};
use wsrelease::settings::ReleaseSettings;

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    if let Err(error) = run_main() {
        eprintln!("{error:?}");
        std::process::exit(1);
    }
}

fn run_main() -> miette::Result<()> {
    let cli = cli::parse();

    wsrelease::tracing::init_tracing(cli.tracing_config())
        .map_err(|e| miette::miette!("Failed to initialize tracing: {e}"))?;

    let settings = ReleaseSettings::from(cli.settings);
    let command = Command::from(cli.command);
    let output = execute_command(command, &settings)?;

    println!("{output}");
    Ok(())
}

#[instrument(skip(settings))]
fn execute_command(command: Command, settings: &ReleaseSettings) -> miette::Result<String> {
    Ok(commands::execute(command, settings)?)
}
