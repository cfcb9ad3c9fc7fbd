//! Metric sinks.

use std::future::Future;
use std::path::PathBuf;

use tokio::process::Command;

use crate::config::MetricsConfig;
use crate::report::{ReportError, ReportResult};

/// A single named value handed to a metric collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub name: String,
    pub value: String,
    pub unit: &'static str,
    pub group: &'static str,
    /// Lifetime of the metric in seconds (gmetric `dmax`).
    pub max_age_secs: u64,
    /// Expected time between reports in seconds (gmetric `tmax`).
    pub time_to_live_secs: u64,
}

/// Destination for metrics.
pub trait MetricSink {
    fn emit(&self, metric: &Metric) -> impl Future<Output = ReportResult<()>> + Send;
}

/// Sink that shells out to Ganglia's `gmetric`.
#[derive(Debug, Clone)]
pub struct GmetricSink {
    path: PathBuf,
}

impl GmetricSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &MetricsConfig) -> Self {
        Self::new(&config.gmetric_path)
    }

    /// Command-line arguments for one metric.
    pub fn args(metric: &Metric) -> Vec<String> {
        vec![
            "-d".to_string(),
            metric.max_age_secs.to_string(),
            "-x".to_string(),
            metric.time_to_live_secs.to_string(),
            "-n".to_string(),
            metric.name.clone(),
            "-v".to_string(),
            metric.value.clone(),
            "-s".to_string(),
            "both".to_string(),
            "-g".to_string(),
            metric.group.to_string(),
            "-t".to_string(),
            metric.unit.to_string(),
        ]
    }
}

impl MetricSink for GmetricSink {
    async fn emit(&self, metric: &Metric) -> ReportResult<()> {
        let command = self.path.display().to_string();
        tracing::debug!(%command, name = %metric.name, value = %metric.value, "Emitting metric");

        let status = Command::new(&self.path)
            .args(Self::args(metric))
            .status()
            .await
            .map_err(|source| ReportError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ReportError::Failed {
                command,
                status: status.to_string(),
            });
        }
        Ok(())
    }
}
