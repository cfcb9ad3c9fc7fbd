//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Stats acquisition:
//!     → timeouts.rs (deadline on every stats endpoint call)
//!     → Elapsed → StatsError::Timeout → UNKNOWN verdict
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: each check is one best-effort attempt, the scheduler retries
//! - The sampling interval sleep is not subject to any deadline

pub mod timeouts;
