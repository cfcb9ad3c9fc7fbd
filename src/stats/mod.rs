//! HAProxy statistics acquisition subsystem.
//!
//! # Data Flow
//! ```text
//! stats endpoint (/;csv;norefresh)
//!     → client.rs (HTTP GET, basic auth, acquisition timeout)
//!     → csv.rs (header-indexed rows: frontends, backends, listeners)
//!     → types.rs (ResponseCounters / BackendAvailability aggregation)
//!     → check subsystem (ratio + availability evaluators)
//! ```
//!
//! # Design Decisions
//! - Checks depend on the `StatsSource` trait, never on HTTP directly
//! - Backend lookup for counters is a linear prefix scan
//! - Every fetch is a fresh snapshot; nothing is cached between calls

pub mod client;
pub mod csv;
pub mod types;

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;

pub use client::HttpStatsSource;
pub use types::{BackendAvailability, ListenerStatus, ResponseCounters, StatsError, StatsResult};

/// A source of HAProxy statistics snapshots.
pub trait StatsSource {
    /// Sum the response-code counters of every backend whose name starts
    /// with `prefix`. Fails with [`StatsError::NotFound`] when nothing matches.
    fn fetch_response_counters(
        &self,
        prefix: &str,
    ) -> impl Future<Output = StatsResult<ResponseCounters>> + Send;

    /// Up/down tallies per backend, restricted to `filter` when one is given.
    fn fetch_listener_statuses(
        &self,
        filter: Option<&BTreeSet<String>>,
    ) -> impl Future<Output = StatsResult<BTreeMap<String, BackendAvailability>>> + Send;
}
