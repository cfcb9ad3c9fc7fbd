//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Keep stdout free for check results
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Logs go to stderr; the monitoring system reads the verdict from stdout
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(level: &str) -> String {
    format!("haproxy_checks={}", level)
}

/// Initialize the global subscriber. Safe to call more than once.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
