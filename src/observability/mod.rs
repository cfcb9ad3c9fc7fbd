//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events on stderr)
//!
//! The check verdict itself is not a log event: it is printed to stdout
//! and returned as the exit code.
//! ```

pub mod logging;
