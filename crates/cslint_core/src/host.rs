//! Host (bundler) interface.

use std::path::Path;

use crate::{LoaderOptions, ReportPayload};

/// What the host can do with diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host accepts warnings.
    pub emit_warning: bool,
    /// The host accepts errors.
    pub emit_error: bool,
    /// The host renders error values rather than bare strings.
    pub structured_payload: bool,
}

impl HostCapabilities {
    /// A host with both channels and structured payloads.
    pub fn full() -> Self {
        Self {
            emit_warning: true,
            emit_error: true,
            structured_payload: true,
        }
    }

    /// A host with no way to report diagnostics.
    pub fn none() -> Self {
        Self {
            emit_warning: false,
            emit_error: false,
            structured_payload: false,
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

/// The per-module context a bundler hands to the loader.
pub trait LoaderContext {
    /// Bundler-wide options. Defaults to none.
    fn global_options(&self) -> LoaderOptions {
        LoaderOptions::default()
    }

    /// Options given to this loader invocation; they override the global ones.
    fn loader_options(&self) -> LoaderOptions;

    /// Path of the module being processed.
    fn resource_path(&self) -> &Path;

    /// Marks the result as cacheable by the host.
    fn cacheable(&mut self);

    /// Registers a file whose changes must trigger reprocessing.
    fn add_dependency(&mut self, path: &Path);

    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities::full()
    }

    /// Reports a non-fatal warning.
    fn emit_warning(&mut self, payload: ReportPayload);

    /// Reports a non-fatal error.
    fn emit_error(&mut self, payload: ReportPayload);
}
