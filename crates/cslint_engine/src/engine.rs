//! Lint engine abstraction.

use std::sync::Arc;

use crate::{EngineError, Issue};

/// Rule name to rule settings, exactly as the engine's configuration file expects it.
pub type RuleSet = serde_json::Map<String, serde_json::Value>;

/// Trait for the external linter the loader delegates to.
///
/// Implementations must be deterministic for a given input: the loader caches
/// results keyed by source text and configuration.
pub trait LintEngine: Send + Sync {
    /// Version of the underlying linter, used to fingerprint cached results.
    fn version(&self) -> &str;

    /// Lints `source` with the given rules.
    ///
    /// # Arguments
    ///
    /// * `source` - Source text of the module
    /// * `rules` - Merged rule configuration
    /// * `literate` - Whether the source mixes prose and code
    ///
    /// # Returns
    ///
    /// Issues in the order the engine reported them.
    fn lint(&self, source: &str, rules: &RuleSet, literate: bool)
    -> Result<Vec<Issue>, EngineError>;
}

/// Selects the engine for a configured linter path.
pub trait EngineProvider: Send + Sync {
    /// Returns the engine for `cslint_path`, or the default engine when `None`.
    fn engine(&self, cslint_path: Option<&str>) -> Result<Arc<dyn LintEngine>, EngineError>;
}

/// A single engine serves every linter path.
impl<E: LintEngine + 'static> EngineProvider for Arc<E> {
    fn engine(&self, _cslint_path: Option<&str>) -> Result<Arc<dyn LintEngine>, EngineError> {
        Ok(Arc::clone(self) as Arc<dyn LintEngine>)
    }
}
