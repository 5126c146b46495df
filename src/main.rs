//! Scriptforge CLI entry point
//!
//! Dispatches to subcommands.

use clap::Parser;
use console::style;
use scriptforge::cli::{Cli, Commands};
use scriptforge::config::ConfigManager;
use scriptforge::error::ForgeResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ForgeResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("scriptforge=warn"),
        1 => EnvFilter::new("scriptforge=info"),
        _ => EnvFilter::new("scriptforge=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    match cli.command {
        Commands::Run(args) => scriptforge::cli::commands::run(args, &config).await,
        Commands::Status => scriptforge::cli::commands::status(&config).await,
    }
}
