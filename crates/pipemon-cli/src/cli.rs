//! CLI argument parsing for pipemon

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pipeline run metrics extractor
#[derive(Parser, Debug, Clone)]
#[command(name = "pipemon")]
#[command(about = "Extract metrics from pipeline and task runs")]
#[command(version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error), overridden by RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Snapshot output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Prometheus text exposition
    Prometheus,
}

/// Commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Record run files through the configured monitors and print the result
    Replay(ReplayArgs),
    /// List the metrics a configuration defines
    Names {
        /// Monitor configuration file
        #[arg(long, short)]
        config: PathBuf,
    },
    /// Validate a configuration
    Check {
        /// Monitor configuration file
        #[arg(long, short)]
        config: PathBuf,
    },
}

/// Arguments of `replay`
#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Monitor configuration file
    #[arg(long, short)]
    pub config: PathBuf,

    /// Snapshot output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Clean every run after recording it
    #[arg(long)]
    pub clean: bool,

    /// JSON files holding a run or an array of runs
    #[arg(required = true)]
    pub records: Vec<PathBuf>,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["pipemon", "check", "--config", "monitors.toml"]);
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, LogFormat::Text);
        match cli.command {
            Commands::Check { config } => assert_eq!(config, PathBuf::from("monitors.toml")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_replay_args() {
        let cli = Cli::parse_from([
            "pipemon",
            "--log-level", "debug",
            "--log-format", "json",
            "replay",
            "-c", "monitors.toml",
            "--format", "prometheus",
            "--clean",
            "a.json", "b.json",
        ]);
        assert_eq!(cli.log_level, "debug");
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.format, OutputFormat::Prometheus);
                assert!(args.clean);
                assert_eq!(args.records, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_replay_requires_records() {
        assert!(Cli::try_parse_from(["pipemon", "replay", "--config", "m.toml"]).is_err());
    }
}
