//! Backend availability check.
//!
//! # Responsibilities
//! - Report requested backends that the stats page does not know about
//! - Classify each backend by its fraction of members up
//! - Classify each backend by its absolute number of members down
//!
//! # Design Decisions
//! - Percent thresholds are strict (`<`): exactly at threshold is healthy
//! - Down-count thresholds are inclusive (`>=`) and disabled when unset or 0
//! - Percent and down-count findings are independent; both feed the aggregate
//! - Missing backends do not short-circuit the per-backend checks

use std::collections::{BTreeMap, BTreeSet};

use crate::check::severity::{Severity, SeverityAggregator};
use crate::check::CheckError;
use crate::config::AvailabilityCheckConfig;
use crate::stats::{BackendAvailability, StatsSource};

/// Availability thresholds for one invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailabilityThresholds {
    pub warning_percent: f64,
    pub critical_percent: f64,
    pub warning_down: Option<u32>,
    pub critical_down: Option<u32>,
}

impl From<&AvailabilityCheckConfig> for AvailabilityThresholds {
    fn from(config: &AvailabilityCheckConfig) -> Self {
        Self {
            warning_percent: config.warning_percent,
            critical_percent: config.critical_percent,
            warning_down: config.warning_down.filter(|&limit| limit > 0),
            critical_down: config.critical_down.filter(|&limit| limit > 0),
        }
    }
}

/// Severity from the fraction of members up, if any threshold is crossed.
pub fn classify_up_ratio(up_ratio: f64, thresholds: &AvailabilityThresholds) -> Option<Severity> {
    if up_ratio < thresholds.critical_percent {
        Some(Severity::Critical)
    } else if up_ratio < thresholds.warning_percent {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Severity from the number of members down, if any threshold is crossed.
pub fn classify_down_count(
    down_count: u32,
    thresholds: &AvailabilityThresholds,
) -> Option<Severity> {
    if thresholds.critical_down.is_some_and(|limit| down_count >= limit) {
        Some(Severity::Critical)
    } else if thresholds.warning_down.is_some_and(|limit| down_count >= limit) {
        Some(Severity::Warning)
    } else {
        None
    }
}

fn severity_word(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "critical",
        _ => "warning",
    }
}

/// Requested backend names absent from the snapshot.
pub fn missing_backends(
    requested: &BTreeSet<String>,
    found: &BTreeMap<String, BackendAvailability>,
) -> Vec<String> {
    requested
        .iter()
        .filter(|name| !found.contains_key(*name))
        .cloned()
        .collect()
}

/// Record every finding for a snapshot into `status`.
pub fn assess(
    requested: &BTreeSet<String>,
    found: &BTreeMap<String, BackendAvailability>,
    thresholds: &AvailabilityThresholds,
    status: &mut SeverityAggregator,
) {
    let missing = missing_backends(requested, found);
    if !missing.is_empty() {
        status.record(
            Severity::Critical,
            format!(
                "There are missing backends that were requested to be monitored: {}",
                missing.join(", ")
            ),
        );
    }

    for (name, backend) in found {
        let up_ratio = backend.up_ratio();
        let down_count = backend.down_count();

        if let Some(severity) = classify_up_ratio(up_ratio, thresholds) {
            status.record(
                severity,
                format!(
                    "Backend {} has a {} percentage of services up ({}%)",
                    name,
                    severity_word(severity),
                    (up_ratio * 100.0) as u32
                ),
            );
        }

        if let Some(severity) = classify_down_count(down_count, thresholds) {
            status.record(
                severity,
                format!(
                    "Backend {} has a {} number of services down ({})",
                    name,
                    severity_word(severity),
                    down_count
                ),
            );
        }
    }
}

/// Run the availability check against one stats snapshot.
pub async fn evaluate<S: StatsSource>(
    source: &S,
    config: &AvailabilityCheckConfig,
) -> Result<SeverityAggregator, CheckError> {
    let requested: BTreeSet<String> = config.backends.iter().cloned().collect();
    let filter = (!requested.is_empty()).then_some(&requested);

    let found = source.fetch_listener_statuses(filter).await?;
    tracing::info!(
        requested = requested.len(),
        found = found.len(),
        "Listener statuses sampled"
    );

    let mut status = SeverityAggregator::new();
    assess(&requested, &found, &AvailabilityThresholds::from(config), &mut status);
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::testing::ScriptedSource;

    fn snapshot(entries: &[(&str, u32, u32)]) -> BTreeMap<String, BackendAvailability> {
        entries
            .iter()
            .map(|(name, count, up)| {
                (name.to_string(), BackendAvailability::new(*count, *up))
            })
            .collect()
    }

    fn percents(warning: f64, critical: f64) -> AvailabilityConfigBuilder {
        AvailabilityConfigBuilder(AvailabilityCheckConfig {
            warning_percent: warning,
            critical_percent: critical,
            ..AvailabilityCheckConfig::default()
        })
    }

    struct AvailabilityConfigBuilder(AvailabilityCheckConfig);

    impl AvailabilityConfigBuilder {
        fn down(mut self, warning: u32, critical: u32) -> Self {
            self.0.warning_down = Some(warning);
            self.0.critical_down = Some(critical);
            self
        }

        fn backends(mut self, names: &[&str]) -> Self {
            self.0.backends = names.iter().map(|n| n.to_string()).collect();
            self
        }

        fn build(self) -> AvailabilityCheckConfig {
            self.0
        }
    }

    async fn run(
        entries: &[(&str, u32, u32)],
        config: AvailabilityCheckConfig,
    ) -> SeverityAggregator {
        let source = ScriptedSource::availability(snapshot(entries));
        evaluate(&source, &config).await.unwrap()
    }

    #[test]
    fn test_percent_boundaries_are_strict() {
        let thresholds = AvailabilityThresholds::from(&percents(0.9, 0.6).build());
        assert_eq!(classify_up_ratio(0.9, &thresholds), None);
        assert_eq!(classify_up_ratio(0.89, &thresholds), Some(Severity::Warning));
        assert_eq!(classify_up_ratio(0.6, &thresholds), Some(Severity::Warning));
        assert_eq!(classify_up_ratio(0.59, &thresholds), Some(Severity::Critical));
    }

    #[test]
    fn test_down_boundaries_are_inclusive() {
        let thresholds =
            AvailabilityThresholds::from(&percents(0.1, 0.1).down(1, 16).build());
        assert_eq!(classify_down_count(0, &thresholds), None);
        assert_eq!(classify_down_count(1, &thresholds), Some(Severity::Warning));
        assert_eq!(classify_down_count(15, &thresholds), Some(Severity::Warning));
        assert_eq!(classify_down_count(16, &thresholds), Some(Severity::Critical));
    }

    #[test]
    fn test_down_thresholds_disabled_when_unset() {
        let thresholds = AvailabilityThresholds::from(&AvailabilityCheckConfig::default());
        assert_eq!(classify_down_count(1000, &thresholds), None);
    }

    #[test]
    fn test_zero_down_thresholds_disable_the_check() {
        let thresholds = AvailabilityThresholds::from(&percents(0.9, 0.6).down(0, 0).build());
        assert_eq!(thresholds.warning_down, None);
        assert_eq!(thresholds.critical_down, None);
        assert_eq!(classify_down_count(0, &thresholds), None);
        assert_eq!(classify_down_count(50, &thresholds), None);
    }

    #[test]
    fn test_inverted_thresholds_still_classify() {
        let thresholds = AvailabilityThresholds::from(&percents(0.5, 0.7).down(5, 2).build());
        assert_eq!(classify_down_count(3, &thresholds), Some(Severity::Critical));
        assert_eq!(classify_down_count(1, &thresholds), None);
        assert_eq!(classify_up_ratio(0.6, &thresholds), Some(Severity::Critical));
        assert_eq!(classify_up_ratio(0.7, &thresholds), None);
    }

    #[tokio::test]
    async fn test_percents_ok() {
        let entries = [("backend-1", 2, 2), ("backend-2", 100, 90)];
        let status = run(&entries, percents(0.9, 0.6).build()).await;
        assert_eq!(status.final_severity(), Severity::Ok);
        assert!(status.findings().is_empty());
    }

    #[tokio::test]
    async fn test_percents_warn() {
        let entries = [("backend-1", 4, 3), ("backend-2", 100, 90)];
        let status = run(&entries, percents(0.9, 0.6).build()).await;
        assert_eq!(status.final_severity(), Severity::Warning);
        assert_eq!(
            status.findings()[0].message,
            "Backend backend-1 has a warning percentage of services up (75%)"
        );
    }

    #[tokio::test]
    async fn test_percents_critical() {
        let entries = [("backend-1", 4, 2), ("backend-2", 100, 61)];
        let status = run(&entries, percents(0.9, 0.6).build()).await;
        assert_eq!(status.final_severity(), Severity::Critical);

        let severities: Vec<_> = status.findings().iter().map(|f| f.severity).collect();
        assert_eq!(severities, vec![Severity::Critical, Severity::Warning]);
    }

    #[tokio::test]
    async fn test_down_ok() {
        let config = percents(0.1, 0.1).down(1, 16).build();
        let status = run(&[("backend-1", 2, 2), ("backend-2", 100, 100)], config).await;
        assert_eq!(status.final_severity(), Severity::Ok);
    }

    #[tokio::test]
    async fn test_down_warn() {
        let config = percents(0.1, 0.1).down(1, 16).build();
        let status = run(&[("backend-1", 2, 1), ("backend-2", 100, 90)], config).await;
        assert_eq!(status.final_severity(), Severity::Warning);
        assert_eq!(status.findings().len(), 2);
    }

    #[tokio::test]
    async fn test_down_critical() {
        let config = percents(0.1, 0.1).down(1, 16).build();
        let status = run(&[("backend-1", 2, 1), ("backend-2", 100, 75)], config).await;
        assert_eq!(status.final_severity(), Severity::Critical);
        assert_eq!(
            status.findings()[1].message,
            "Backend backend-2 has a critical number of services down (25)"
        );
    }

    #[tokio::test]
    async fn test_down_warning_combined_with_percent_critical() {
        let config = percents(0.9, 0.6).down(1, 16).build();
        let status = run(&[("backend-1", 10, 8), ("backend-2", 4, 1)], config).await;

        let findings: Vec<_> = status
            .findings()
            .iter()
            .map(|f| (f.severity, f.message.as_str()))
            .collect();
        assert_eq!(
            findings,
            vec![
                (
                    Severity::Warning,
                    "Backend backend-1 has a warning percentage of services up (80%)"
                ),
                (
                    Severity::Warning,
                    "Backend backend-1 has a warning number of services down (2)"
                ),
                (
                    Severity::Critical,
                    "Backend backend-2 has a critical percentage of services up (25%)"
                ),
                (
                    Severity::Warning,
                    "Backend backend-2 has a warning number of services down (3)"
                ),
            ]
        );
        assert_eq!(status.final_severity(), Severity::Critical);
    }

    #[tokio::test]
    async fn test_missing_backend_is_critical() {
        let config = percents(0.9, 0.6)
            .backends(&["backend-1", "no-such-backend"])
            .build();
        let status = run(&[("backend-1", 2, 2), ("backend-2", 100, 90)], config).await;

        assert_eq!(status.final_severity(), Severity::Critical);
        assert_eq!(
            status.findings()[0].message,
            "There are missing backends that were requested to be monitored: no-such-backend"
        );
    }

    #[tokio::test]
    async fn test_missing_backend_does_not_short_circuit() {
        let config = percents(0.9, 0.6).backends(&["backend-1", "gone"]).build();
        let status = run(&[("backend-1", 4, 3)], config).await;

        let severities: Vec<_> = status.findings().iter().map(|f| f.severity).collect();
        assert_eq!(severities, vec![Severity::Critical, Severity::Warning]);
    }

    #[tokio::test]
    async fn test_requested_backends_forwarded_as_filter() {
        let source = ScriptedSource::availability(snapshot(&[("backend-1", 2, 2)]));
        let config = percents(0.9, 0.6).backends(&["backend-1"]).build();
        let status = evaluate(&source, &config).await.unwrap();

        assert_eq!(status.final_severity(), Severity::Ok);
        let expected: BTreeSet<String> = ["backend-1".to_string()].into_iter().collect();
        assert_eq!(source.requested_filters(), vec![Some(expected)]);
    }

    #[tokio::test]
    async fn test_no_filter_when_nothing_requested() {
        let source = ScriptedSource::availability(snapshot(&[("backend-1", 2, 2)]));
        evaluate(&source, &AvailabilityCheckConfig::default()).await.unwrap();
        assert_eq!(source.requested_filters(), vec![None]);
    }

    #[tokio::test]
    async fn test_acquisition_failure_propagates() {
        let source = ScriptedSource::failing("connection refused");
        let result = evaluate(&source, &AvailabilityCheckConfig::default()).await;
        assert!(matches!(result, Err(CheckError::Stats(_))));
    }
}
