//! Per-module lint pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cslint_cache::{CacheKey, ResultCache};
use cslint_engine::{EngineProvider, Issue, LintEngine, RuleSet};
use serde::Serialize;
use tracing::debug;

use crate::error::LoaderError;
use crate::formatter::Formatter;
use crate::policy::{self, Action, Fatal};
use crate::rule_loader::{load_rules, merge_rules};
use crate::{LoaderConfig, LoaderContext};

/// What the loader hands back to the host: its input, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOutput {
    pub source: String,
    pub source_map: Option<String>,
}

/// Lints modules on behalf of a bundler.
///
/// One `Loader` serves every module of a build; each call to [`Loader::run`]
/// is independent of the others.
pub struct Loader {
    engines: Arc<dyn EngineProvider>,
    formatter: Formatter,
    working_dir: Option<PathBuf>,
}

impl Loader {
    /// Creates a loader that obtains engines from `engines`.
    pub fn new(engines: impl EngineProvider + 'static) -> Self {
        Self {
            engines: Arc::new(engines),
            formatter: Formatter::new(),
            working_dir: None,
        }
    }

    /// Uses `formatter` to render reports.
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Shows module paths relative to `dir` instead of the process working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Lints one module and reports the result through `ctx`.
    ///
    /// The source and source map come back unchanged. Errors abort the
    /// module: rules file and cache failures, engine failures, and lint
    /// results that the configured policy turns fatal.
    pub async fn run<C>(
        &self,
        ctx: &mut C,
        source: String,
        source_map: Option<String>,
    ) -> Result<LoaderOutput, LoaderError>
    where
        C: LoaderContext + ?Sized,
    {
        let options = ctx.global_options().merge(ctx.loader_options());
        let engine = self.engines.engine(options.cslint_path.as_deref())?;
        let config = LoaderConfig::resolve(options, engine.version());

        let rules = merge_rules(&config.rules, load_rules(&config.config_file)?);
        ctx.add_dependency(&config.config_file);
        ctx.cacheable();

        let resource_path = self.display_path(ctx.resource_path());
        debug!("Linting {}", resource_path);

        let issues = match &config.cache_dir {
            Some(dir) => lint_cached(engine, &config, dir, rules, &source).await?,
            None => engine.lint(&source, &rules, config.literate)?,
        };

        self.report(ctx, &config, &issues, &resource_path)?;

        Ok(LoaderOutput { source, source_map })
    }

    fn report<C>(
        &self,
        ctx: &mut C,
        config: &LoaderConfig,
        issues: &[Issue],
        resource_path: &str,
    ) -> Result<(), LoaderError>
    where
        C: LoaderContext + ?Sized,
    {
        if issues.is_empty() {
            return Ok(());
        }

        if let Some(reporter) = &config.reporter {
            reporter.report(issues);
            return Ok(());
        }

        let Some(report) = self.formatter.format(issues, config.quiet, resource_path) else {
            return Ok(());
        };

        match policy::decide(&report, &config.policy_flags(), &ctx.capabilities()) {
            Action::None => Ok(()),
            Action::EmitWarning(payload) => {
                ctx.emit_warning(payload);
                Ok(())
            }
            Action::EmitError(payload) => {
                ctx.emit_error(payload);
                Ok(())
            }
            Action::Fatal(Fatal::Escalated(report)) => Err(LoaderError::LintFailed(report)),
            Action::Fatal(Fatal::Unsupported(message)) => Err(LoaderError::Emission(message)),
        }
    }

    fn display_path(&self, path: &Path) -> String {
        let cwd = self
            .working_dir
            .clone()
            .or_else(|| std::env::current_dir().ok());

        match cwd.as_deref().and_then(|cwd| path.strip_prefix(cwd).ok()) {
            Some(relative) => relative.display().to_string(),
            None => path.display().to_string(),
        }
    }
}

/// Everything besides the source that decides a lint result.
#[derive(Serialize)]
struct Fingerprint<'a> {
    options: &'a LoaderConfig,
    rules: &'a RuleSet,
}

async fn lint_cached(
    engine: Arc<dyn LintEngine>,
    config: &LoaderConfig,
    cache_dir: &Path,
    rules: RuleSet,
    source: &str,
) -> Result<Vec<Issue>, LoaderError> {
    let cache = ResultCache::new(cache_dir);
    let key = CacheKey::from_options(
        config.cache_identifier.as_str(),
        &Fingerprint {
            options: config,
            rules: &rules,
        },
        source,
    )?;

    let source = source.to_string();
    let literate = config.literate;
    cache
        .get_or_compute(&key, move || {
            engine
                .lint(&source, &rules, literate)
                .map_err(LoaderError::from)
        })
        .await
}
