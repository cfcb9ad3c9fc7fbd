//! Command-line interface.
//!
//! One subcommand per check. Flags override values from the optional TOML
//! configuration file, which in turn override the built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::check::{self, availability, ratio, CheckError, Severity, SeverityAggregator};
use crate::config::validation::{validate_availability_check, validate_ratio_check};
use crate::config::{load_config, ChecksConfig, ConfigError, StatsConfig};
use crate::report::reporter::resolve_hostname;
use crate::report::{report_error_ratio, GmetricSink};
use crate::stats::HttpStatsSource;

#[derive(Parser, Debug)]
#[command(name = "haproxy-checks", version)]
#[command(about = "Monitoring checks for HAProxy backends", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the HTTP 5xx ratio of a backend over a sampling interval
    #[command(name = "check-5xx")]
    Check5xx(RatioArgs),
    /// Check the share and number of members up in each backend
    #[command(name = "check-up")]
    CheckUp(UpArgs),
    /// Report the HTTP 5xx percentage of a backend to gmetric
    #[command(name = "metrics-5xx")]
    Metrics5xx(MetricsArgs),
}

/// Stats endpoint flags shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Stats page location, e.g. 127.0.0.1/haproxy/stats.
    #[arg(long)]
    pub base_url_path: Option<String>,

    /// Username to login to the HAProxy stats page.
    #[arg(long)]
    pub username: Option<String>,

    /// Password to login to the HAProxy stats page.
    #[arg(long)]
    pub password: Option<String>,

    /// Deadline for a single stats fetch, in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl StatsArgs {
    fn apply(&self, config: &mut StatsConfig) {
        if let Some(base_url_path) = &self.base_url_path {
            config.base_url_path = base_url_path.clone();
        }
        if self.username.is_some() {
            config.username = self.username.clone();
        }
        if self.password.is_some() {
            config.password = self.password.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
    }
}

#[derive(Args, Debug)]
pub struct RatioArgs {
    #[command(flatten)]
    pub stats: StatsArgs,

    /// Backend name prefix to check the 5xx ratio of.
    #[arg(long)]
    pub backend: Option<String>,

    /// 5xx ratio above which the check warns [default: 0.01].
    #[arg(long)]
    pub warning_ratio: Option<f64>,

    /// 5xx ratio above which the check is critical [default: 0.02].
    #[arg(long)]
    pub critical_ratio: Option<f64>,

    /// Time to observe 5xx rates, in seconds [default: 60].
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Args, Debug)]
pub struct UpArgs {
    #[command(flatten)]
    pub stats: StatsArgs,

    /// Backend to check (repeatable). Defaults to all backends.
    #[arg(long = "backend")]
    pub backends: Vec<String>,

    /// Up fraction (non-inclusive) below which the check warns [default: 0.9].
    #[arg(long)]
    pub warning_percent: Option<f64>,

    /// Up fraction (non-inclusive) below which the check is critical [default: 0.6].
    #[arg(long)]
    pub critical_percent: Option<f64>,

    /// Down count at or above which the check warns.
    #[arg(long)]
    pub warning_down: Option<u32>,

    /// Down count at or above which the check is critical.
    #[arg(long)]
    pub critical_down: Option<u32>,
}

#[derive(Args, Debug)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub stats: StatsArgs,

    /// Backend name prefix to report the 5xx percentage of.
    #[arg(long)]
    pub backend: Option<String>,

    /// Time to observe 5xx rates, in seconds [default: 60].
    #[arg(long)]
    pub interval: Option<u64>,

    /// Path to the gmetric binary [default: /usr/bin/gmetric].
    #[arg(long)]
    pub gmetric_path: Option<String>,

    /// gmetric tmax setting [default: 120].
    #[arg(long)]
    pub gmetric_tmax: Option<u64>,

    /// gmetric dmax setting [default: 150].
    #[arg(long)]
    pub gmetric_dmax: Option<u64>,

    /// Host name to use in the metric name instead of the detected one.
    #[arg(long)]
    pub host: Option<String>,
}

impl Cli {
    /// Load the configuration file (if any) and apply flag overrides.
    pub fn load_config(&self) -> Result<ChecksConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ChecksConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Overlay command-line flags onto `config`.
    pub fn apply(&self, config: &mut ChecksConfig) {
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }

        match &self.command {
            Commands::Check5xx(args) => {
                args.stats.apply(&mut config.stats);
                let ratio = &mut config.ratio;
                if args.backend.is_some() {
                    ratio.backend = args.backend.clone();
                }
                if let Some(warning) = args.warning_ratio {
                    ratio.warning_ratio = warning;
                }
                if let Some(critical) = args.critical_ratio {
                    ratio.critical_ratio = critical;
                }
                if let Some(interval) = args.interval {
                    ratio.interval_secs = interval;
                }
            }
            Commands::CheckUp(args) => {
                args.stats.apply(&mut config.stats);
                let availability = &mut config.availability;
                if !args.backends.is_empty() {
                    availability.backends = args.backends.clone();
                }
                if let Some(warning) = args.warning_percent {
                    availability.warning_percent = warning;
                }
                if let Some(critical) = args.critical_percent {
                    availability.critical_percent = critical;
                }
                if args.warning_down.is_some() {
                    availability.warning_down = args.warning_down;
                }
                if args.critical_down.is_some() {
                    availability.critical_down = args.critical_down;
                }
            }
            Commands::Metrics5xx(args) => {
                args.stats.apply(&mut config.stats);
                if args.backend.is_some() {
                    config.ratio.backend = args.backend.clone();
                }
                if let Some(interval) = args.interval {
                    config.ratio.interval_secs = interval;
                }
                let metrics = &mut config.metrics;
                if let Some(path) = &args.gmetric_path {
                    metrics.gmetric_path = path.clone();
                }
                if let Some(tmax) = args.gmetric_tmax {
                    metrics.tmax = tmax;
                }
                if let Some(dmax) = args.gmetric_dmax {
                    metrics.dmax = dmax;
                }
                if args.host.is_some() {
                    metrics.host = args.host.clone();
                }
            }
        }
    }
}

/// Run the selected check against a fully merged configuration.
pub async fn execute(
    command: &Commands,
    config: &ChecksConfig,
) -> Result<SeverityAggregator, CheckError> {
    match command {
        Commands::Check5xx(_) => {
            validate_ratio_check(&config.stats, &config.ratio).map_err(ConfigError::from)?;
            let source = HttpStatsSource::new(&config.stats)?;
            ratio::evaluate(&source, &config.ratio).await
        }
        Commands::CheckUp(_) => {
            validate_availability_check(&config.stats, &config.availability)
                .map_err(ConfigError::from)?;
            let source = HttpStatsSource::new(&config.stats)?;
            availability::evaluate(&source, &config.availability).await
        }
        Commands::Metrics5xx(_) => {
            validate_ratio_check(&config.stats, &config.ratio).map_err(ConfigError::from)?;
            let source = HttpStatsSource::new(&config.stats)?;
            let sink = GmetricSink::from_config(&config.metrics);
            let host = resolve_hostname(&config.metrics).await?;

            let metric =
                report_error_ratio(&source, &sink, &host, &config.ratio, &config.metrics).await?;

            let mut status = SeverityAggregator::new();
            status.record(Severity::Ok, format!("Reported {} = {}", metric.name, metric.value));
            Ok(status)
        }
    }
}

/// Run the selected check behind the UNKNOWN boundary; never fails.
pub async fn run(
    command: &Commands,
    config: Result<ChecksConfig, ConfigError>,
) -> SeverityAggregator {
    let result = match config {
        Ok(config) => execute(command, &config).await,
        Err(e) => Err(e.into()),
    };
    check::conclude(result)
}
