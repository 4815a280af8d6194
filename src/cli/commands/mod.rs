//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod categories;
mod serve;
mod snapshot;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings, LoadOptions};

#[derive(Parser)]
#[command(name = "price-tracker")]
#[command(about = "Coupang/Naver listing proxy and bestseller snapshot scraper")]
#[command(version)]
pub struct Cli {
    /// Config file path (discovered in the standard locations when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Run the listing proxy server
    Serve {
        /// Bind address: a port, a host, or host:port (default: 127.0.0.1:5000)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Capture bestseller snapshots for one or more categories
    Snapshot {
        /// Category keys to scrape (all categories when omitted)
        categories: Vec<String>,
        /// Directory for snapshot files (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List known bestseller categories
    Categories,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let settings = load_settings(&options).await?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.server.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Snapshot {
            categories,
            output_dir,
        } => snapshot::cmd_snapshot(&settings, &categories, output_dir).await,
        Commands::Categories => categories::cmd_categories(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot_args() {
        let cli = Cli::try_parse_from([
            "price-tracker",
            "snapshot",
            "beauty",
            "food",
            "--output-dir",
            "/tmp/out",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Snapshot {
                categories,
                output_dir,
            } => {
                assert_eq!(categories, vec!["beauty", "food"]);
                assert_eq!(output_dir, Some(PathBuf::from("/tmp/out")));
            }
            _ => panic!("expected snapshot command"),
        }
    }

    #[test]
    fn test_parse_serve_with_global_config() {
        let cli = Cli::try_parse_from([
            "price-tracker",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Serve { bind: Some(ref b) } if b == "0.0.0.0:8080"
        ));
    }
}
