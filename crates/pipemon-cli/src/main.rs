//! pipemon binary
//!
//! Replays pipeline and task run records through configured monitors and
//! prints the aggregated metrics.
//!
//! ## Usage
//!
//! ```bash
//! pipemon check --config monitors.toml
//! pipemon names --config monitors.toml
//! pipemon replay --config monitors.toml --format prometheus runs/*.json
//! ```

mod cli;
mod commands;
mod config;
mod error;

use anyhow::Result;
use cli::{Cli, Commands, LogFormat};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(&cli);

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Commands::Replay(args) => commands::replay(args, pipemon_metrics::global(), &mut stdout),
        Commands::Names { config } => commands::names(config, &mut stdout),
        Commands::Check { config } => commands::check(config, &mut stdout),
    }
}

/// Logs go to stderr, stdout carries command output
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
