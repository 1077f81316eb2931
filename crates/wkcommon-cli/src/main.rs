//! wkcommon CLI - Flag whether WaniKani vocabulary words are common Japanese.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wkcommon_cli::commands;
use wkcommon_cli::repl;
use wkcommon_cli::{Cli, Command, Config, Formatter};
use wkcommon_indicator::StorageBackend;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> wkcommon_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config; an explicit path must exist, the default one is created on first run
    let config_path = match &cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::path()?,
    };
    let config = if cli.config.is_none() && !config_path.exists() {
        let cfg = Config::default();
        cfg.save_to(&config_path).ok();
        cfg
    } else {
        Config::load_from(&config_path)?
    };

    // Initialize tracing (log to stderr, stdout carries command output)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.settings.log_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    let backend = if cli.ephemeral {
        StorageBackend::Memory
    } else {
        StorageBackend::Sqlite(config.database_path()?)
    };

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&config, backend, &formatter).await?;
        }
        Some(Command::Check(args)) => {
            commands::execute_check(args, &config, backend, &formatter).await?;
        }
        Some(Command::Watch(args)) => {
            commands::execute_watch(args, &config, backend, &formatter).await?;
        }
        Some(Command::Cache(args)) => {
            commands::execute_cache(args, &config, backend, &formatter)?;
        }
        Some(Command::Config(args)) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
    }

    Ok(())
}
