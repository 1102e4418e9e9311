//! Lint command implementation

use std::path::PathBuf;
use std::sync::Arc;

use cslint_core::{
    CommandEngineProvider, Formatter, HostCapabilities, Loader, LoaderError, LoaderOptions,
};
use miette::{IntoDiagnostic, Result};
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::cli::{Cli, LintArgs};
use crate::host::CliHost;

/// Why a file could not be linted.
enum FileError {
    /// The source file could not be read.
    Read(std::io::Error),
    Loader(LoaderError),
}

/// Result of linting one file.
struct FileOutcome {
    path: PathBuf,
    host: CliHost,
    result: Result<(), FileError>,
}

/// Lints every file concurrently and prints reports in argument order.
///
/// Returns whether any file reported errors or failed its lint policy.
pub fn run_lint(cli: &Cli, args: &LintArgs) -> Result<bool> {
    let global = match &cli.options {
        Some(path) => LoaderOptions::from_file(path).into_diagnostic()?,
        None => LoaderOptions::default(),
    };
    let options = args.loader_options(cli);

    let formatter = if args.no_color {
        Formatter::plain()
    } else {
        Formatter::new()
    };
    let loader = Arc::new(Loader::new(CommandEngineProvider::new()).with_formatter(formatter));
    let capabilities = HostCapabilities {
        structured_payload: !args.plain_payload,
        ..HostCapabilities::full()
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    let outcomes = runtime.block_on(async {
        let mut tasks = JoinSet::new();
        for (index, path) in args.files.iter().enumerate() {
            let loader = Arc::clone(&loader);
            let path = path.clone();
            let host = CliHost::new(path.clone(), global.clone(), options.clone(), capabilities);
            tasks.spawn(async move { (index, lint_file(loader, path, host).await) });
        }

        let mut outcomes = Vec::with_capacity(args.files.len());
        while let Some(joined) = tasks.join_next().await {
            outcomes.push(joined.into_diagnostic()?);
        }
        outcomes.sort_by_key(|(index, _)| *index);
        Ok::<_, miette::Report>(outcomes)
    })?;

    let mut has_errors = false;
    let mut failed = 0;

    for (_, outcome) in outcomes {
        for payload in outcome.host.warnings.iter().chain(&outcome.host.errors) {
            println!("{}", payload);
        }
        has_errors |= !outcome.host.errors.is_empty();

        match outcome.result {
            Ok(()) => {}
            Err(FileError::Loader(
                e @ (LoaderError::LintFailed(_) | LoaderError::Emission(_)),
            )) => {
                println!("{}", e);
                has_errors = true;
            }
            Err(FileError::Loader(e)) => {
                error!("{}: {}", outcome.path.display(), e);
                failed += 1;
            }
            Err(FileError::Read(e)) => {
                error!("Failed to read {}: {}", outcome.path.display(), e);
                failed += 1;
            }
        }
    }

    info!("Linted {} files", args.files.len());

    if failed > 0 {
        return Err(miette::miette!(
            "{} of {} files could not be linted",
            failed,
            args.files.len()
        ));
    }

    Ok(has_errors)
}

async fn lint_file(loader: Arc<Loader>, path: PathBuf, mut host: CliHost) -> FileOutcome {
    let result = match tokio::fs::read_to_string(&path).await {
        Ok(source) => loader
            .run(&mut host, source, None)
            .await
            .map(|_| ())
            .map_err(FileError::Loader),
        Err(e) => Err(FileError::Read(e)),
    };

    FileOutcome { path, host, result }
}
