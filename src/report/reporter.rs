//! 5xx percentage reporting.
//!
//! # Responsibilities
//! - Measure the windowed 5xx ratio of a backend
//! - Name the metric after the reporting host and backend
//! - Hand the percentage to a metric sink

use tokio::process::Command;

use crate::check::ratio::measure;
use crate::check::CheckError;
use crate::config::{MetricsConfig, RatioCheckConfig};
use crate::report::sink::{Metric, MetricSink};
use crate::report::{ReportError, ReportResult};
use crate::stats::StatsSource;

/// `haproxy_{host}_{backend}_5xx_percent`
pub fn metric_name(host: &str, backend: &str) -> String {
    format!("haproxy_{}_{}_5xx_percent", host, backend)
}

/// Ratio as a percentage with two decimals (`0.1` → `"10.00"`).
pub fn percent_value(ratio: f64) -> String {
    format!("{:.2}", ratio * 100.0)
}

/// Resolve the host name used in metric names.
///
/// Order: configured override, the `hostname` command, `$HOSTNAME`.
pub async fn resolve_hostname(config: &MetricsConfig) -> ReportResult<String> {
    if let Some(host) = config.host.as_deref().filter(|h| !h.is_empty()) {
        return Ok(host.to_string());
    }

    match Command::new("hostname").output().await {
        Ok(output) if output.status.success() => {
            let host = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !host.is_empty() {
                return Ok(host);
            }
        }
        Ok(output) => tracing::debug!(status = %output.status, "hostname command failed"),
        Err(e) => tracing::debug!(error = %e, "hostname command unavailable"),
    }

    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| {
            ReportError::Hostname("no hostname command and HOSTNAME is unset".to_string())
        })
}

/// Measure the backend's 5xx ratio and emit it as a percentage.
pub async fn report_error_ratio<S, M>(
    source: &S,
    sink: &M,
    host: &str,
    ratio_config: &RatioCheckConfig,
    metrics_config: &MetricsConfig,
) -> Result<Metric, CheckError>
where
    S: StatsSource,
    M: MetricSink,
{
    let report = measure(source, ratio_config).await?;

    let metric = Metric {
        name: metric_name(host, &report.backend),
        value: percent_value(report.ratio),
        unit: "float",
        group: "haproxy",
        max_age_secs: metrics_config.dmax,
        time_to_live_secs: metrics_config.tmax,
    };

    sink.emit(&metric).await?;
    tracing::info!(name = %metric.name, value = %metric.value, "Metric reported");

    Ok(metric)
}
