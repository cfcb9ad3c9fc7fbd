//! Check severities and the per-invocation severity accumulator.
//!
//! # States
//! ```text
//! OK < WARNING < CRITICAL < UNKNOWN
//! ```
//!
//! # Design Decisions
//! - The discriminant is the process exit code
//! - UNKNOWN ranks highest so acquisition failures dominate threshold breaches
//! - The accumulator never downgrades once raised

use std::fmt;

/// Verdict of a check, ordered by urgency.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Severity {
    /// Process exit code expected by the monitoring system.
    pub fn exit_code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message emitted by a check, tagged with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Running worst severity across every finding of one invocation.
#[derive(Debug, Clone, Default)]
pub struct SeverityAggregator {
    status: Severity,
    findings: Vec<Finding>,
}

impl SeverityAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding and raise the running severity if needed.
    pub fn record(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();

        match severity {
            Severity::Ok => tracing::debug!(%severity, %message, "Check finding"),
            Severity::Warning => tracing::info!(%severity, %message, "Check finding"),
            Severity::Critical | Severity::Unknown => {
                tracing::warn!(%severity, %message, "Check finding")
            }
        }

        if severity > self.status {
            self.status = severity;
        }
        self.findings.push(Finding { severity, message });
    }

    /// Highest severity recorded so far, `OK` when nothing was recorded.
    pub fn final_severity(&self) -> Severity {
        self.status
    }

    /// Findings in the order they were recorded.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}
