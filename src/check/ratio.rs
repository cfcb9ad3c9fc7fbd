//! Windowed 5xx ratio check.
//!
//! # Responsibilities
//! - Sample a backend's response counters twice, `interval` apart
//! - Turn the counter deltas into a 5xx ratio
//! - Classify the ratio against warning/critical thresholds
//!
//! # Design Decisions
//! - No traffic in the window is healthy (ratio 0.0), not unknown
//! - Thresholds are strict: a ratio equal to a threshold does not escalate
//! - A shrinking total means HAProxy restarted; that is an acquisition failure

use std::time::Duration;

use tokio::time;

use crate::check::severity::{Severity, SeverityAggregator};
use crate::check::CheckError;
use crate::config::RatioCheckConfig;
use crate::stats::{ResponseCounters, StatsError, StatsResult, StatsSource};

/// Warning and critical 5xx ratio thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioThresholds {
    pub warning: f64,
    pub critical: f64,
}

impl From<&RatioCheckConfig> for RatioThresholds {
    fn from(config: &RatioCheckConfig) -> Self {
        Self {
            warning: config.warning_ratio,
            critical: config.critical_ratio,
        }
    }
}

/// Ratio of 5xx responses between two counter samples.
pub fn error_ratio(before: &ResponseCounters, after: &ResponseCounters) -> StatsResult<f64> {
    let (total_before, total_after) = (before.total(), after.total());
    if total_after < total_before {
        return Err(StatsError::CounterReset {
            before: total_before,
            after: total_after,
        });
    }

    let total_delta = total_after - total_before;
    if total_delta == 0 {
        return Ok(0.0);
    }

    let errors_delta = after.hrsp_5xx as f64 - before.hrsp_5xx as f64;
    Ok(errors_delta / total_delta as f64)
}

/// Map a ratio to a severity.
pub fn classify_ratio(ratio: f64, thresholds: RatioThresholds) -> Severity {
    if ratio > thresholds.critical {
        Severity::Critical
    } else if ratio > thresholds.warning {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

/// Sample `backend`, wait `interval`, sample again and return the 5xx ratio.
///
/// The wait is a plain sleep; it is neither cancellable nor bounded by the
/// acquisition timeout.
pub async fn sample_error_ratio<S: StatsSource>(
    source: &S,
    backend: &str,
    interval: Duration,
) -> StatsResult<f64> {
    let before = source.fetch_response_counters(backend).await?;
    tracing::debug!(backend, interval_secs = interval.as_secs(), "Waiting for second sample");
    time::sleep(interval).await;
    let after = source.fetch_response_counters(backend).await?;

    error_ratio(&before, &after)
}

/// Outcome of one 5xx ratio measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioReport {
    pub backend: String,
    pub ratio: f64,
    pub interval_secs: u64,
    pub thresholds: RatioThresholds,
    pub severity: Severity,
}

impl RatioReport {
    pub fn message(&self) -> String {
        format!(
            "{} traffic has HTTP 5xx ratio of {:.4} in the past {} seconds. \
             Thresholds: warning: {}, critical: {}",
            self.backend,
            self.ratio,
            self.interval_secs,
            self.thresholds.warning,
            self.thresholds.critical
        )
    }
}

fn required_backend(config: &RatioCheckConfig) -> Result<&str, CheckError> {
    config
        .backend
        .as_deref()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| {
            CheckError::Usage("a backend is required for the 5xx ratio check".to_string())
        })
}

/// Measure and classify the 5xx ratio of the configured backend.
pub async fn measure<S: StatsSource>(
    source: &S,
    config: &RatioCheckConfig,
) -> Result<RatioReport, CheckError> {
    let backend = required_backend(config)?;
    let thresholds = RatioThresholds::from(config);
    let interval = Duration::from_secs(config.interval_secs);
    let ratio = sample_error_ratio(source, backend, interval).await?;
    let severity = classify_ratio(ratio, thresholds);

    tracing::info!(backend, ratio, %severity, "5xx ratio measured");

    Ok(RatioReport {
        backend: backend.to_string(),
        ratio,
        interval_secs: config.interval_secs,
        thresholds,
        severity,
    })
}

/// Run the 5xx ratio check.
pub async fn evaluate<S: StatsSource>(
    source: &S,
    config: &RatioCheckConfig,
) -> Result<SeverityAggregator, CheckError> {
    let report = measure(source, config).await?;
    let mut status = SeverityAggregator::new();
    status.record(report.severity, report.message());
    Ok(status)
}
