//! Snapshot types and error definitions for stats acquisition.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Add;

use thiserror::Error;

/// Errors that can occur while acquiring a stats snapshot.
#[derive(Debug, Error)]
pub enum StatsError {
    /// No backend matched the requested name prefix.
    #[error("Did not find {0} backend")]
    NotFound(String),

    /// Transport or authentication failure reaching the stats endpoint.
    #[error("Stats acquisition failed: {0}")]
    Acquisition(String),

    /// The stats endpoint did not answer in time.
    #[error("Stats acquisition timed out after {0} seconds")]
    Timeout(u64),

    /// The stats payload could not be understood.
    #[error("Stats parse error: {0}")]
    Parse(String),

    /// Counters went backwards between two samples (HAProxy restarted).
    #[error(
        "Response counters went backwards ({before} -> {after} total responses), HAProxy likely restarted"
    )]
    CounterReset { before: u64, after: u64 },
}

/// Result type for stats operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Cumulative HTTP response counters for one or more backends.
///
/// Counters are monotone for the lifetime of the HAProxy process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseCounters {
    pub hrsp_1xx: u64,
    pub hrsp_2xx: u64,
    pub hrsp_3xx: u64,
    pub hrsp_4xx: u64,
    pub hrsp_5xx: u64,
    pub hrsp_other: u64,
}

impl ResponseCounters {
    /// Build counters from the `(1xx, 2xx, 3xx, 4xx, 5xx, other)` tuple order.
    pub const fn new(
        hrsp_1xx: u64,
        hrsp_2xx: u64,
        hrsp_3xx: u64,
        hrsp_4xx: u64,
        hrsp_5xx: u64,
        hrsp_other: u64,
    ) -> Self {
        Self {
            hrsp_1xx,
            hrsp_2xx,
            hrsp_3xx,
            hrsp_4xx,
            hrsp_5xx,
            hrsp_other,
        }
    }

    /// Total responses across every class.
    pub fn total(&self) -> u64 {
        self.hrsp_1xx
            .saturating_add(self.hrsp_2xx)
            .saturating_add(self.hrsp_3xx)
            .saturating_add(self.hrsp_4xx)
            .saturating_add(self.hrsp_5xx)
            .saturating_add(self.hrsp_other)
    }
}

impl Add for ResponseCounters {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            hrsp_1xx: self.hrsp_1xx.saturating_add(rhs.hrsp_1xx),
            hrsp_2xx: self.hrsp_2xx.saturating_add(rhs.hrsp_2xx),
            hrsp_3xx: self.hrsp_3xx.saturating_add(rhs.hrsp_3xx),
            hrsp_4xx: self.hrsp_4xx.saturating_add(rhs.hrsp_4xx),
            hrsp_5xx: self.hrsp_5xx.saturating_add(rhs.hrsp_5xx),
            hrsp_other: self.hrsp_other.saturating_add(rhs.hrsp_other),
        }
    }
}

/// One load-balancer member and whether it reports as up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerStatus {
    pub backend: String,
    pub is_up: bool,
}

impl ListenerStatus {
    /// Interpret a raw HAProxy status string (`UP`, `UP 1/3`, `DOWN`, `MAINT`...).
    pub fn from_status(backend: impl Into<String>, status: &str) -> Self {
        Self {
            backend: backend.into(),
            is_up: status.contains("UP"),
        }
    }
}

/// Member counts for a single backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendAvailability {
    pub count: u32,
    pub up_count: u32,
}

impl BackendAvailability {
    pub fn new(count: u32, up_count: u32) -> Self {
        Self { count, up_count }
    }

    pub fn down_count(&self) -> u32 {
        self.count.saturating_sub(self.up_count)
    }

    /// Fraction of members that are up, in `[0, 1]`.
    pub fn up_ratio(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        f64::from(self.up_count) / f64::from(self.count)
    }
}

/// Sum counters over every backend whose name starts with `prefix`.
pub fn sum_counters<'a, I>(backends: I, prefix: &str) -> StatsResult<ResponseCounters>
where
    I: IntoIterator<Item = (&'a str, ResponseCounters)>,
{
    let mut sums = ResponseCounters::default();
    let mut matched = false;

    for (name, counters) in backends {
        if !name.starts_with(prefix) {
            continue;
        }
        sums = sums + counters;
        matched = true;
    }

    if matched {
        Ok(sums)
    } else {
        Err(StatsError::NotFound(prefix.to_string()))
    }
}

/// Group listener records by backend, keeping only allow-listed names.
///
/// A backend only appears in the result once at least one member was seen.
pub fn tally_listeners<I>(
    listeners: I,
    filter: Option<&BTreeSet<String>>,
) -> BTreeMap<String, BackendAvailability>
where
    I: IntoIterator<Item = ListenerStatus>,
{
    let filter = filter.filter(|names| !names.is_empty());
    let mut found: BTreeMap<String, BackendAvailability> = BTreeMap::new();

    for listener in listeners {
        if let Some(names) = filter {
            if !names.contains(&listener.backend) {
                continue;
            }
        }
        let entry = found.entry(listener.backend).or_default();
        entry.count += 1;
        if listener.is_up {
            entry.up_count += 1;
        }
    }

    found
}
