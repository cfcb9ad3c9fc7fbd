//! Health check subsystem.
//!
//! # Data Flow
//! ```text
//! 5xx ratio (ratio.rs):
//!     sample counters → sleep(interval) → sample counters
//!     → delta ratio → OK / WARNING / CRITICAL
//!
//! Availability (availability.rs):
//!     one listener snapshot → missing backends + per-backend thresholds
//!     → findings recorded into severity.rs aggregator
//!
//! Boundary (this module):
//!     any CheckError → UNKNOWN with a bounded diagnostic
//! ```
//!
//! # Design Decisions
//! - Evaluators propagate errors with `?`; only `conclude` turns them into UNKNOWN
//! - One aggregator per invocation, threaded explicitly; no global state
//! - No retries anywhere; the scheduler owns retry policy

pub mod availability;
pub mod ratio;
pub mod severity;

use thiserror::Error;

use crate::config::ConfigError;
use crate::report::ReportError;
use crate::stats::StatsError;

pub use severity::{Finding, Severity, SeverityAggregator};

/// Maximum length, in characters, of an UNKNOWN diagnostic.
pub const MAX_DIAGNOSTIC_CHARS: usize = 256;

/// Anything that prevents a check from reaching a threshold verdict.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),

    /// The check was invoked without something it needs.
    #[error("{0}")]
    Usage(String),
}

/// Cut `message` to at most `max_chars` characters.
pub fn truncate_chars(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((byte_index, _)) => message[..byte_index].to_string(),
        None => message.to_string(),
    }
}

/// Outermost boundary of every check: failures become a single UNKNOWN finding.
pub fn conclude(result: Result<SeverityAggregator, CheckError>) -> SeverityAggregator {
    match result {
        Ok(status) => status,
        Err(err) => {
            tracing::error!(error = %err, "Check could not complete");
            let mut status = SeverityAggregator::new();
            status.record(
                Severity::Unknown,
                format!(
                    "Got the following unhandled error: {}",
                    truncate_chars(&err.to_string(), MAX_DIAGNOSTIC_CHARS)
                ),
            );
            status
        }
    }
}
