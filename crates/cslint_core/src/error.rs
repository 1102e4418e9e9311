//! Loader error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::LintReport;

/// Errors raised while reading the rules file or loader options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be resolved or read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON (comments allowed).
    #[error("{0}")]
    Parse(String),

    /// The file holds no JSON value at all.
    #[error("Rules file is empty: {}", .0.display())]
    Empty(PathBuf),

    /// The file holds JSON that is not an object.
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// Options that do not match the recognized loader options.
    #[error("Invalid loader options: {0}")]
    Options(String),
}

impl ConfigError {
    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates an invalid options error.
    pub fn options(message: impl Into<String>) -> Self {
        Self::Options(message.into())
    }
}

/// Errors that abort processing of a module.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Rules file or options error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Lint engine error.
    #[error(transparent)]
    Engine(#[from] cslint_engine::EngineError),

    /// Cache error.
    #[error(transparent)]
    Cache(#[from] cslint_cache::CacheError),

    /// The module failed because of lint results (`failOnError` / `failOnWarning`).
    #[error(transparent)]
    LintFailed(#[from] LintReport),

    /// The host offers no way to report diagnostics.
    #[error("{0}")]
    Emission(String),
}
