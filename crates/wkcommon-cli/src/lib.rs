//! wkcommon CLI library.
//!
//! Configuration, command execution and output formatting for the `wkcommon`
//! binary, which runs vocabulary words through the commonality indicator.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::{CheckRow, Formatter, TerminalView};
