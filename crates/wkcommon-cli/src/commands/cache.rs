//! Cache command implementation.

use crate::cli::{CacheAction, CacheArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::io::{self, Write};
use wkcommon_cache::CommonalityCache;
use wkcommon_domain::{CommonalityVerdict, VocabularyToken};
use wkcommon_indicator::{DynStore, StorageBackend};

/// Execute the cache command.
pub fn execute_cache(
    args: CacheArgs,
    config: &Config,
    backend: StorageBackend,
    formatter: &Formatter,
) -> Result<()> {
    let cache = open_cache(config, &backend)?;

    match args.action {
        CacheAction::Get { word } => {
            let verdict = cached_verdict(&cache, &word)?;
            println!("{}", formatter.cached_verdict(&word, verdict)?);
        }
        CacheAction::Clear { yes } => {
            if !yes && !confirm(&format!(
                "Remove every cached verdict under '{}'?",
                cache.namespace()
            ))? {
                println!("{}", formatter.info("Operation cancelled"));
                return Ok(());
            }

            let removed = cache.clear()?;
            println!(
                "{}",
                formatter.success(&format!("Removed {} cached verdict(s)", removed))
            );
        }
    }

    Ok(())
}

/// Open the verdict cache for the configured namespace.
pub fn open_cache(config: &Config, backend: &StorageBackend) -> Result<CommonalityCache<DynStore>> {
    let store = backend.open()?;
    Ok(CommonalityCache::new(
        store,
        config.indicator.cache_namespace.clone(),
    ))
}

/// Read the unexpired verdict for `word`, if any.
pub fn cached_verdict(
    cache: &CommonalityCache<DynStore>,
    word: &str,
) -> Result<Option<CommonalityVerdict>> {
    let token = VocabularyToken::new(word.trim()).map_err(CliError::InvalidInput)?;
    Ok(cache.get(&token))
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}
