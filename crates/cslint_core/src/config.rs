//! Loader options.
//!
//! Options arrive in two layers, the bundler-wide options and the per-module
//! loader options. `LoaderOptions::merge` overlays them and
//! `LoaderConfig::resolve` fills in the defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cslint_engine::{Issue, RuleSet};
use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize, Serializer};

use crate::ConfigError;
use crate::policy::PolicyFlags;

/// Default rules file.
pub const DEFAULT_CONFIG_FILE: &str = "./coffeelint.json";

pub use cslint_cache::DEFAULT_CACHE_DIR;

/// The `cache` option: a switch or a cache directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheSetting {
    Enabled(bool),
    Directory(PathBuf),
}

impl CacheSetting {
    /// Directory to cache into, or `None` when caching is off.
    pub fn directory(&self) -> Option<PathBuf> {
        match self {
            Self::Enabled(true) => Some(PathBuf::from(DEFAULT_CACHE_DIR)),
            Self::Enabled(false) => None,
            Self::Directory(dir) => Some(dir.clone()),
        }
    }
}

impl Default for CacheSetting {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

/// Custom sink that receives the raw issues instead of the formatted report.
#[derive(Clone)]
pub struct Reporter(Arc<dyn Fn(&[Issue]) + Send + Sync>);

impl Reporter {
    pub fn new(report: impl Fn(&[Issue]) + Send + Sync + 'static) -> Self {
        Self(Arc::new(report))
    }

    pub fn report(&self, issues: &[Issue]) {
        (self.0)(issues)
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reporter(..)")
    }
}

impl PartialEq for Reporter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Options as supplied by the host, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderOptions {
    /// Linter implementation to run.
    pub cslint_path: Option<String>,

    /// Rules file path.
    pub config_file: Option<PathBuf>,

    /// Lint as literate CoffeeScript.
    pub literate: Option<bool>,

    /// Cache switch or directory.
    pub cache: Option<CacheSetting>,

    /// Overrides the identifier derived from the linter version.
    pub cache_identifier: Option<String>,

    /// Inline rules, overridden per rule by the rules file.
    pub rules: Option<RuleSet>,

    /// Custom issue sink. Set programmatically.
    #[serde(skip)]
    pub reporter: Option<Reporter>,

    /// Only report errors.
    pub quiet: Option<bool>,

    /// Always report through the host's error channel.
    pub emit_error: Option<bool>,

    /// Always report through the host's warning channel.
    pub emit_warning: Option<bool>,

    /// Fail the module when errors are reported.
    pub fail_on_error: Option<bool>,

    /// Fail the module when warnings are reported.
    pub fail_on_warning: Option<bool>,
}

impl LoaderOptions {
    /// Parses options from JSON (comments allowed).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| ConfigError::parse(e.to_string()))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        serde_json::from_value(value).map_err(|e| ConfigError::options(e.to_string()))
    }

    /// Loads options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Overlays `overrides` on `self`. Any field present in `overrides` wins
    /// as a whole; `rules` are not merged key by key.
    pub fn merge(self, overrides: LoaderOptions) -> LoaderOptions {
        LoaderOptions {
            cslint_path: overrides.cslint_path.or(self.cslint_path),
            config_file: overrides.config_file.or(self.config_file),
            literate: overrides.literate.or(self.literate),
            cache: overrides.cache.or(self.cache),
            cache_identifier: overrides.cache_identifier.or(self.cache_identifier),
            rules: overrides.rules.or(self.rules),
            reporter: overrides.reporter.or(self.reporter),
            quiet: overrides.quiet.or(self.quiet),
            emit_error: overrides.emit_error.or(self.emit_error),
            emit_warning: overrides.emit_warning.or(self.emit_warning),
            fail_on_error: overrides.fail_on_error.or(self.fail_on_error),
            fail_on_warning: overrides.fail_on_warning.or(self.fail_on_warning),
        }
    }
}

/// Fully resolved loader configuration for one module.
///
/// Serializes to the option fingerprint that keys cached results; the cache
/// location and identifier are kept out of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cslint_path: Option<String>,
    #[serde(serialize_with = "serialize_path_lossy")]
    pub config_file: PathBuf,
    pub literate: bool,
    #[serde(skip)]
    pub cache_dir: Option<PathBuf>,
    #[serde(skip)]
    pub cache_identifier: String,
    pub rules: RuleSet,
    #[serde(skip)]
    pub reporter: Option<Reporter>,
    pub quiet: bool,
    pub emit_error: bool,
    pub emit_warning: bool,
    pub fail_on_error: bool,
    pub fail_on_warning: bool,
}

impl LoaderConfig {
    /// Applies defaults to merged options.
    ///
    /// `engine_version` seeds the cache identifier unless one was given.
    pub fn resolve(options: LoaderOptions, engine_version: &str) -> Self {
        Self {
            cslint_path: options.cslint_path,
            config_file: options
                .config_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            literate: options.literate.unwrap_or(false),
            cache_dir: options.cache.unwrap_or_default().directory(),
            cache_identifier: options
                .cache_identifier
                .unwrap_or_else(|| default_cache_identifier(engine_version)),
            rules: options.rules.unwrap_or_default(),
            reporter: options.reporter,
            quiet: options.quiet.unwrap_or(false),
            emit_error: options.emit_error.unwrap_or(false),
            emit_warning: options.emit_warning.unwrap_or(false),
            fail_on_error: options.fail_on_error.unwrap_or(false),
            fail_on_warning: options.fail_on_warning.unwrap_or(false),
        }
    }

    /// Returns whether results are cached.
    pub fn cache_enabled(&self) -> bool {
        self.cache_dir.is_some()
    }

    /// The flags the reporting policy looks at.
    pub fn policy_flags(&self) -> PolicyFlags {
        PolicyFlags {
            emit_error: self.emit_error,
            emit_warning: self.emit_warning,
            fail_on_error: self.fail_on_error,
            fail_on_warning: self.fail_on_warning,
        }
    }
}

fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// `{"cslint":"<version>"}`, the identifier used when none is configured.
pub fn default_cache_identifier(engine_version: &str) -> String {
    serde_json::json!({ "cslint": engine_version }).to_string()
}
