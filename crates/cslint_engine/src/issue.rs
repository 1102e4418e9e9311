//! Issue records reported by a lint engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level for issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    #[default]
    Error,
    /// Warning - should be reviewed.
    #[serde(alias = "warn")]
    Warning,
}

impl Severity {
    /// Returns the label shown in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem reported by the linter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Severity level.
    pub level: Severity,

    /// First line of the offending code (1-indexed).
    pub line_number: u32,

    /// Last line, for issues spanning several lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number_end: Option<u32>,

    /// The issue message.
    pub message: String,

    /// Extra detail about this occurrence, preferred over `message` when shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// The rule that produced this issue.
    pub rule: String,
}

impl Issue {
    /// Creates a new issue.
    pub fn new(
        level: Severity,
        line_number: u32,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            line_number,
            line_number_end: None,
            message: message.into(),
            context: None,
            rule: rule.into(),
        }
    }

    /// Creates an error issue.
    pub fn error(line_number: u32, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, line_number, rule, message)
    }

    /// Creates a warning issue.
    pub fn warning(line_number: u32, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, line_number, rule, message)
    }

    /// Sets the end line.
    pub fn with_line_end(mut self, line_number_end: u32) -> Self {
        self.line_number_end = Some(line_number_end);
        self
    }

    /// Sets the context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns true for error-level issues.
    pub fn is_error(&self) -> bool {
        self.level == Severity::Error
    }

    /// Line range as shown in reports: `12`, or `12-15` for multi-line issues.
    pub fn line_range(&self) -> String {
        match self.line_number_end {
            Some(end) if end != self.line_number => format!("{}-{}", self.line_number, end),
            _ => self.line_number.to_string(),
        }
    }

    /// Context when present and non-empty, otherwise the message.
    pub fn display_text(&self) -> &str {
        match self.context.as_deref() {
            Some(context) if !context.is_empty() => context,
            _ => &self.message,
        }
    }
}
