//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use wkcommon_domain::SessionKind;

/// wkcommon - Flag whether vocabulary words are common Japanese.
#[derive(Debug, Parser)]
#[command(name = "wkcommon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "WKCOMMON_CONFIG")]
    pub config: Option<String>,

    /// Keep verdicts in memory only, ignoring the on-disk cache
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (indicator class only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether words are common
    Check(CheckArgs),

    /// Drive the indicator from a stream of host item payloads
    Watch(WatchArgs),

    /// Inspect or clear cached verdicts
    Cache(CacheArgs),

    /// Show configuration
    Config(ConfigArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Vocabulary words to check
    #[arg(required = true)]
    pub words: Vec<String>,
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Read JSON lines from a file instead of stdin
    #[arg(short = 'i', long)]
    pub file: Option<String>,

    /// Session for lines that do not name one
    #[arg(short, long, value_enum, default_value = "review")]
    pub session: SessionArg,
}

/// Arguments for cache management.
#[derive(Debug, Parser)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache management actions.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Show the cached verdict for a word
    Get {
        /// Vocabulary word
        word: String,
    },

    /// Remove every cached verdict
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Arguments for configuration commands.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

/// Session argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SessionArg {
    /// Review session
    Review,
    /// Lesson session
    Lesson,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<SessionArg> for SessionKind {
    fn from(session: SessionArg) -> Self {
        match session {
            SessionArg::Review => SessionKind::Review,
            SessionArg::Lesson => SessionKind::Lesson,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_repl() {
        let cli = Cli::parse_from(["wkcommon"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::parse_from(["wkcommon", "check", "大人", "一人", "--format", "json"]);
        match cli.command {
            Some(Command::Check(args)) => assert_eq!(args.words, vec!["大人", "一人"]),
            _ => panic!("Expected Check command"),
        }
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }

    #[test]
    fn test_check_requires_words() {
        assert!(Cli::try_parse_from(["wkcommon", "check"]).is_err());
    }

    #[test]
    fn test_cache_clear_flags() {
        let cli = Cli::parse_from(["wkcommon", "--ephemeral", "cache", "clear", "-y"]);
        assert!(cli.ephemeral);
        assert!(matches!(
            cli.command,
            Some(Command::Cache(CacheArgs {
                action: CacheAction::Clear { yes: true }
            }))
        ));
    }

    #[test]
    fn test_session_conversion() {
        let session: SessionKind = SessionArg::Lesson.into();
        assert_eq!(session, SessionKind::Lesson);
    }
}
