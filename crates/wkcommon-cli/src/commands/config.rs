//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let rendered = match formatter.format() {
                OutputFormat::Json => serde_json::to_string_pretty(config)?,
                _ => config.to_toml()?,
            };
            println!("{}", rendered);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            if formatter.format() == OutputFormat::Table {
                println!("cache: {}", config.database_path()?.display());
            }
        }
    }
    Ok(())
}
