//! Reporting policy: which host channel a report goes to, or whether the
//! module fails outright.

use crate::{HostCapabilities, LintReport, Report, ReportPayload};

const UNSUPPORTED_PREFIX: &str = "Your module system doesn't support emitWarning. \
                                  Update available? \n";
const ERROR_PREFIX: &str = "Module failed because of a cslint error.\n";
const WARNING_PREFIX: &str = "Module failed because of a cslint warning.\n";

/// Flags that steer the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyFlags {
    pub emit_error: bool,
    pub emit_warning: bool,
    pub fail_on_error: bool,
    pub fail_on_warning: bool,
}

/// Why a module cannot complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fatal {
    /// `failOnError` / `failOnWarning` was triggered.
    Escalated(LintReport),
    /// The host cannot receive the report on the chosen channel.
    Unsupported(String),
}

impl Fatal {
    pub fn message(&self) -> &str {
        match self {
            Self::Escalated(report) => report.message(),
            Self::Unsupported(message) => message,
        }
    }
}

/// Outcome of the policy for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    EmitWarning(ReportPayload),
    EmitError(ReportPayload),
    Fatal(Fatal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Warning,
    Error,
}

/// Decides what happens with `report`.
///
/// The channel follows the error count unless `emit_error` or `emit_warning`
/// forces one (`emit_error` wins). A host without that channel fails the
/// module. Otherwise `fail_on_error`, then `fail_on_warning`, may escalate.
pub fn decide(report: &Report, flags: &PolicyFlags, capabilities: &HostCapabilities) -> Action {
    if report.is_empty() {
        return Action::None;
    }

    let channel = if flags.emit_error {
        Channel::Error
    } else if flags.emit_warning {
        Channel::Warning
    } else if report.has_errors() {
        Channel::Error
    } else {
        Channel::Warning
    };

    let supported = match channel {
        Channel::Error => capabilities.emit_error,
        Channel::Warning => capabilities.emit_warning,
    };
    if !supported {
        return Action::Fatal(Fatal::Unsupported(format!(
            "{}{}",
            UNSUPPORTED_PREFIX, report.text
        )));
    }

    if flags.fail_on_error && report.error_count > 0 {
        return Action::Fatal(Fatal::Escalated(LintReport::new(format!(
            "{}{}",
            ERROR_PREFIX, report.text
        ))));
    }
    if flags.fail_on_warning && report.warning_count > 0 {
        return Action::Fatal(Fatal::Escalated(LintReport::new(format!(
            "{}{}",
            WARNING_PREFIX, report.text
        ))));
    }

    let payload = ReportPayload::new(report.text.clone(), capabilities.structured_payload);
    match channel {
        Channel::Error => Action::EmitError(payload),
        Channel::Warning => Action::EmitWarning(payload),
    }
}
