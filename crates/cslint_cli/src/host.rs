//! A `LoaderContext` for linting files outside a bundler.

use std::path::{Path, PathBuf};

use cslint_core::{HostCapabilities, LoaderContext, LoaderOptions, ReportPayload};
use tracing::debug;

/// Collects what the loader reports for one file.
pub struct CliHost {
    path: PathBuf,
    global: LoaderOptions,
    options: LoaderOptions,
    capabilities: HostCapabilities,
    pub warnings: Vec<ReportPayload>,
    pub errors: Vec<ReportPayload>,
}

impl CliHost {
    pub fn new(
        path: PathBuf,
        global: LoaderOptions,
        options: LoaderOptions,
        capabilities: HostCapabilities,
    ) -> Self {
        Self {
            path,
            global,
            options,
            capabilities,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl LoaderContext for CliHost {
    fn global_options(&self) -> LoaderOptions {
        self.global.clone()
    }

    fn loader_options(&self) -> LoaderOptions {
        self.options.clone()
    }

    fn resource_path(&self) -> &Path {
        &self.path
    }

    fn cacheable(&mut self) {}

    fn add_dependency(&mut self, path: &Path) {
        debug!("{} depends on {}", self.path.display(), path.display());
    }

    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn emit_warning(&mut self, payload: ReportPayload) {
        self.warnings.push(payload);
    }

    fn emit_error(&mut self, payload: ReportPayload) {
        self.errors.push(payload);
    }
}
