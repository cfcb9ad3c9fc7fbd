//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap stats endpoint calls with a deadline
//! - Cancel the pending call cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from transport errors

use std::future::Future;
use std::time::Duration;

use tokio::time;

use crate::stats::{StatsError, StatsResult};

/// Run `fut`, failing with [`StatsError::Timeout`] once `timeout_secs` elapse.
pub async fn with_acquisition_timeout<T, F>(timeout_secs: u64, fut: F) -> StatsResult<T>
where
    F: Future<Output = StatsResult<T>>,
{
    match time::timeout(Duration::from_secs(timeout_secs), fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_secs, "Stats acquisition timed out");
            Err(StatsError::Timeout(timeout_secs))
        }
    }
}
