//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the checks.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration shared by every check.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ChecksConfig {
    /// Stats endpoint location and credentials.
    pub stats: StatsConfig,

    /// 5xx ratio check settings.
    pub ratio: RatioCheckConfig,

    /// Backend availability check settings.
    pub availability: AvailabilityCheckConfig,

    /// Metric reporting settings.
    pub metrics: MetricsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HAProxy stats endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Stats page location, with or without scheme (e.g., "127.0.0.1/haproxy/stats").
    pub base_url_path: String,

    /// Username for the stats page (basic auth).
    pub username: Option<String>,

    /// Password for the stats page (basic auth).
    pub password: Option<String>,

    /// Deadline for a single stats fetch in seconds.
    pub timeout_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            base_url_path: "127.0.0.1/haproxy/stats".to_string(),
            username: None,
            password: None,
            timeout_secs: 10,
        }
    }
}

/// 5xx ratio check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RatioCheckConfig {
    /// Backend name prefix to observe.
    pub backend: Option<String>,

    /// 5xx ratio above which the check warns.
    pub warning_ratio: f64,

    /// 5xx ratio above which the check is critical.
    pub critical_ratio: f64,

    /// Time between the two samples in seconds.
    pub interval_secs: u64,
}

impl Default for RatioCheckConfig {
    fn default() -> Self {
        Self {
            backend: None,
            warning_ratio: 0.01,
            critical_ratio: 0.02,
            interval_secs: 60,
        }
    }
}

/// Backend availability check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AvailabilityCheckConfig {
    /// Backends to check. Empty means every backend.
    pub backends: Vec<String>,

    /// Up fraction (non-inclusive) below which the check warns.
    pub warning_percent: f64,

    /// Up fraction (non-inclusive) below which the check is critical.
    pub critical_percent: f64,

    /// Down count at or above which the check warns.
    pub warning_down: Option<u32>,

    /// Down count at or above which the check is critical.
    pub critical_down: Option<u32>,
}

impl Default for AvailabilityCheckConfig {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            warning_percent: 0.9,
            critical_percent: 0.6,
            warning_down: None,
            critical_down: None,
        }
    }
}

/// gmetric reporting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Path to the gmetric binary.
    pub gmetric_path: String,

    /// Maximum time in seconds between gmetric calls (gmetric `-x`).
    pub tmax: u64,

    /// Lifetime in seconds of the reported metric (gmetric `-d`).
    pub dmax: u64,

    /// Host name used in the metric name. Detected when unset.
    pub host: Option<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            gmetric_path: "/usr/bin/gmetric".to_string(),
            tmax: 120,
            dmax: 150,
            host: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}
