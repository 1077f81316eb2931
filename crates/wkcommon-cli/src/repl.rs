//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::commands::check::check_words;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use wkcommon_domain::VocabularyToken;
use wkcommon_indicator::{AppController, IndicatorApp, RecordingView, StorageBackend};

/// Run the interactive REPL.
///
/// One controller lives for the whole session, so repeated words are served
/// from the cache.
pub async fn run_repl(config: &Config, backend: StorageBackend, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("wkcommon REPL - Enter words to check, 'help' for commands, 'exit' to quit")
    );
    println!();

    let app = IndicatorApp::build(&config.indicator, backend, RecordingView::new())?;

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("wkcommon> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, app.controller(), formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Exit,
    Help,
    Check(Vec<String>),
    Link(String),
    Stats,
    Clear,
}

/// Parse a REPL command line.
///
/// Anything that is not a keyword is treated as words to check.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let Some(first) = parts.first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    match *first {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "stats" => Ok(ReplCommand::Stats),
        "clear" => Ok(ReplCommand::Clear),
        "link" => match parts.get(1) {
            Some(word) => Ok(ReplCommand::Link(word.to_string())),
            None => Err(CliError::InvalidInput("Usage: link <word>".to_string())),
        },
        "check" if parts.len() == 1 => {
            Err(CliError::InvalidInput("Usage: check <word> [word2] ...".to_string()))
        }
        "check" => Ok(ReplCommand::Check(parts[1..].iter().map(|s| s.to_string()).collect())),
        _ => Ok(ReplCommand::Check(parts.iter().map(|s| s.to_string()).collect())),
    }
}

/// Execute a REPL command.
async fn execute_repl_command(
    cmd: ReplCommand,
    controller: &AppController<RecordingView>,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::Check(words) => {
            let rows = check_words(controller, &words).await?;
            println!("{}", formatter.format_rows(&rows)?);
        }
        ReplCommand::Link(word) => {
            let token = VocabularyToken::new(word).map_err(CliError::InvalidInput)?;
            println!("{}", controller.lookup().search_page_url(&token)?);
        }
        ReplCommand::Stats => {
            println!("{}", controller.metrics().summary());
        }
        ReplCommand::Clear => {
            let removed = controller.clear_cache()?;
            println!(
                "{}",
                formatter.success(&format!("Removed {} cached verdict(s)", removed))
            );
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <word> [word2] ...             - Check whether words are common");
    println!("  check <word> [word2] ...       - Same, for words that clash with a command");
    println!("  link <word>                    - Print the dictionary search page");
    println!("  stats                          - Show session metrics");
    println!("  clear                          - Remove every cached verdict");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_words_are_checked() {
        assert_eq!(
            parse_repl_command("大人 一人").unwrap(),
            ReplCommand::Check(vec!["大人".to_string(), "一人".to_string()])
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_repl_command("q").unwrap(), ReplCommand::Exit);
        assert_eq!(parse_repl_command("?").unwrap(), ReplCommand::Help);
        assert_eq!(parse_repl_command("stats").unwrap(), ReplCommand::Stats);
        assert_eq!(
            parse_repl_command("link 大人").unwrap(),
            ReplCommand::Link("大人".to_string())
        );
    }

    #[test]
    fn test_check_keyword_escapes_commands() {
        assert_eq!(
            parse_repl_command("check clear").unwrap(),
            ReplCommand::Check(vec!["clear".to_string()])
        );
        assert!(parse_repl_command("check").is_err());
        assert!(parse_repl_command("link").is_err());
    }
}
