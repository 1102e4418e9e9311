//! # cslint_core
//!
//! CoffeeLint loader pipeline for module bundlers.
//!
//! This crate provides:
//! - The `Loader` orchestrator, run once per module
//! - Loader options and their merge/default rules
//! - Rules file loading
//! - Diagnostic table formatting
//! - The warn / error / fail policy
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cslint_core::{CommandEngineProvider, Loader};
//!
//! let loader = Loader::new(CommandEngineProvider::new());
//! let output = loader.run(&mut host, source, source_map).await?;
//! ```

mod config;
mod error;
pub mod formatter;
mod host;
mod loader;
pub mod policy;
mod report;
mod rule_loader;

pub use config::{
    CacheSetting, DEFAULT_CACHE_DIR, DEFAULT_CONFIG_FILE, LoaderConfig, LoaderOptions, Reporter,
};
pub use error::{ConfigError, LoaderError};
pub use formatter::{Formatter, Report, pluralize};
pub use host::{HostCapabilities, LoaderContext};
pub use loader::{Loader, LoaderOutput};
pub use policy::{Action, Fatal, PolicyFlags, decide};
pub use report::{LintReport, ReportPayload};
pub use rule_loader::{load_rules, merge_rules};

pub use cslint_cache::{CacheError, CacheKey, ResultCache};
pub use cslint_engine::{
    CommandEngine, CommandEngineProvider, EngineError, EngineProvider, Issue, LintEngine, RuleSet,
    Severity,
};
