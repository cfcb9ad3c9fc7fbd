//! Metric reporting subsystem.
//!
//! # Data Flow
//! ```text
//! 5xx ratio measurement (check::ratio)
//!     → reporter.rs (metric name + percent value)
//!     → sink.rs (MetricSink: gmetric command)
//!     → Ganglia
//! ```
//!
//! # Design Decisions
//! - The sink is a trait so the reporter never spawns processes in tests
//! - Values are pre-formatted strings; the sink does no rounding
//! - A failed emission is an UNKNOWN verdict like any other failure

pub mod reporter;
pub mod sink;

use thiserror::Error;

pub use reporter::{metric_name, percent_value, report_error_ratio};
pub use sink::{GmetricSink, Metric, MetricSink};

/// Errors that can occur while emitting a metric.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The sink command could not be started.
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The sink command ran but reported failure.
    #[error("{command} exited with {status}")]
    Failed { command: String, status: String },

    /// No host name could be determined for the metric name.
    #[error("Could not determine host name: {0}")]
    Hostname(String),
}

/// Result type for reporting operations.
pub type ReportResult<T> = Result<T, ReportError>;
