//! HAProxy monitoring checks.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI flags + config file
//!          │
//!          ▼
//!   ┌─────────────┐    ┌──────────────┐    ┌────────────────────┐
//!   │   config    │───▶│    check     │───▶│ SeverityAggregator │──▶ stdout + exit code
//!   │ (validated) │    │ ratio / up   │    │   (worst wins)     │
//!   └─────────────┘    └──────┬───────┘    └────────────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐    ┌──────────────┐
//!                      │    stats     │───▶│   HAProxy    │
//!                      │ client + csv │◀───│  /;csv page  │
//!                      └──────────────┘    └──────────────┘
//! ```
//!
//! Exit codes: 0 = OK, 1 = WARNING, 2 = CRITICAL, 3 = UNKNOWN.

use std::process::ExitCode;

use clap::Parser;

use haproxy_checks::cli::{self, Cli};
use haproxy_checks::observability::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = cli.load_config();

    let level = match &config {
        Ok(config) => config.observability.log_level.as_str(),
        Err(_) => "warn",
    };
    logging::init(level);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "haproxy-checks starting");

    let status = cli::run(&cli.command, config).await;
    for finding in status.findings() {
        println!("{}", finding);
    }

    ExitCode::from(status.final_severity().exit_code())
}
