//! Engine error types.

use thiserror::Error;

/// Errors that can occur while invoking a lint engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The linter executable could not be started.
    #[error("Failed to run linter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The linter did not report a usable version.
    #[error("Failed to detect linter version: {0}")]
    Version(String),

    /// The linter produced output that is not a raw issue report.
    #[error("Unexpected linter output: {0}")]
    Output(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates a version detection error.
    pub fn version(message: impl Into<String>) -> Self {
        Self::Version(message.into())
    }

    /// Creates an unexpected output error.
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output(message.into())
    }
}
