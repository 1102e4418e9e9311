//! Report values handed to the host.

use std::fmt;

use thiserror::Error;

/// Lint failure carrying a full formatted report as its message.
///
/// Used both as the structured payload of emitted warnings/errors and as the
/// error of a module that failed because of its lint results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LintReport {
    message: String,
}

impl LintReport {
    /// Creates a report with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The full report text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Payload passed to the host's emit hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportPayload {
    /// An error value wrapping the report, for hosts that render error objects.
    Structured(LintReport),
    /// The report text alone.
    PlainText(String),
}

impl ReportPayload {
    /// Builds the payload shape the host asked for.
    pub fn new(text: impl Into<String>, structured: bool) -> Self {
        if structured {
            Self::Structured(LintReport::new(text))
        } else {
            Self::PlainText(text.into())
        }
    }

    /// The report text, whatever the shape.
    pub fn text(&self) -> &str {
        match self {
            Self::Structured(report) => report.message(),
            Self::PlainText(text) => text,
        }
    }
}

impl fmt::Display for ReportPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
