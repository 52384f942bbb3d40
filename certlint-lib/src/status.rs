//! Verdict values reported by rules and by the engine.

use serde::{Deserialize, Serialize};

/// The outcome of one rule against one certificate.
///
/// `Reserved` through `Fatal` are ordered by severity and are produced by rule
/// logic. `NA` and `NE` are assigned by the engine alone: the rule's
/// precondition is absent, or the rule was not yet in force when the
/// certificate was issued. Neither is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "reserved")]
    Reserved,
    #[serde(rename = "pass")]
    Pass,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "fatal")]
    Fatal,
    #[serde(rename = "NA")]
    NA,
    #[serde(rename = "NE")]
    NE,
}

impl Status {
    /// True for statuses produced by running a rule's checks.
    pub fn is_evaluated(self) -> bool {
        !matches!(self, Status::NA | Status::NE)
    }

    /// True for `Error` and `Fatal`.
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Error | Status::Fatal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Reserved => "reserved",
            Status::Pass => "pass",
            Status::Info => "info",
            Status::Warn => "warn",
            Status::Error => "error",
            Status::Fatal => "fatal",
            Status::NA => "NA",
            Status::NE => "NE",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict with optional human-readable details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintResult {
    #[serde(rename = "result")]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LintResult {
    pub fn new(status: Status) -> Self {
        LintResult {
            status,
            details: None,
        }
    }

    pub fn with_details(status: Status, details: impl Into<String>) -> Self {
        LintResult {
            status,
            details: Some(details.into()),
        }
    }

    pub fn pass() -> Self {
        Self::new(Status::Pass)
    }

    pub fn error(details: impl Into<String>) -> Self {
        Self::with_details(Status::Error, details)
    }

    pub fn warn(details: impl Into<String>) -> Self {
        Self::with_details(Status::Warn, details)
    }

    pub fn fatal(details: impl Into<String>) -> Self {
        Self::with_details(Status::Fatal, details)
    }
}
