//! a64lift CLI - AArch64 extension lifter

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing with a level from the verbosity flags
    let default_level = if cli.verbose {
        "a64lift=debug"
    } else if cli.silent {
        "a64lift=error"
    } else {
        "a64lift=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(default_level.parse().unwrap()),
        )
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    std::process::exit(commands::run_command(&cli));
}
