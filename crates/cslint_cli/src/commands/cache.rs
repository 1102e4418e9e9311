//! Cache command implementation

use std::path::PathBuf;

use cslint_core::{DEFAULT_CACHE_DIR, LoaderOptions, ResultCache};
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::Cli;

/// The directory `lint` would cache into: `--cache-dir`, then the `cache`
/// option of the options file, then the default.
fn cache_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.cache_dir {
        return Ok(dir.clone());
    }

    let configured = match &cli.options {
        Some(path) => LoaderOptions::from_file(path)
            .into_diagnostic()?
            .cache
            .and_then(|cache| cache.directory()),
        None => None,
    };

    Ok(configured.unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)))
}

pub fn run_cache_clean(cli: &Cli) -> Result<()> {
    let dir = cache_dir(cli)?;
    let cache = ResultCache::new(&dir);

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?
        .block_on(cache.clear())
        .into_diagnostic()?;

    info!("Cleaned cache at {}", dir.display());
    Ok(())
}
