//! HAProxy monitoring checks library.

pub mod check;
pub mod cli;
pub mod config;
pub mod observability;
pub mod report;
pub mod resilience;
pub mod stats;

pub use check::{Severity, SeverityAggregator};
pub use config::ChecksConfig;
pub use stats::{HttpStatsSource, StatsSource};
