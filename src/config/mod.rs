//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI flags override file values
//!     → validation.rs (semantic checks for the selected check)
//!     → ChecksConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; each invocation is a fresh process
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - An invalid configuration is an UNKNOWN verdict, not a crash

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AvailabilityCheckConfig;
pub use schema::ChecksConfig;
pub use schema::MetricsConfig;
pub use schema::RatioCheckConfig;
pub use schema::StatsConfig;
