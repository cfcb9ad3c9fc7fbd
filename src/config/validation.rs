//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate threshold ranges, and ordering for the 5xx ratio
//! - Validate timeouts are non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ChecksConfig → Result<(), Vec<ValidationError>>
//! - Each check validates only the sections it reads

use crate::config::schema::{AvailabilityCheckConfig, RatioCheckConfig, StatsConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

fn check_threshold(errors: &mut Vec<ValidationError>, field: &'static str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ValidationError::new(
            field,
            format!("must be a finite, non-negative number (got {})", value),
        ));
    }
}

fn check_fraction(errors: &mut Vec<ValidationError>, field: &'static str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::new(
            field,
            format!("must be between 0 and 1 (got {})", value),
        ));
    }
}

/// Validate the stats endpoint section.
pub fn validate_stats(config: &StatsConfig, errors: &mut Vec<ValidationError>) {
    if config.base_url_path.trim().is_empty() {
        errors.push(ValidationError::new("stats.base_url_path", "cannot be empty"));
    }
    if config.timeout_secs == 0 {
        errors.push(ValidationError::new("stats.timeout_secs", "must be greater than 0"));
    }
    if config.password.is_some() && config.username.is_none() {
        errors.push(ValidationError::new("stats.password", "set without stats.username"));
    }
}

/// Validate the 5xx ratio section.
pub fn validate_ratio(config: &RatioCheckConfig, errors: &mut Vec<ValidationError>) {
    match config.backend.as_deref() {
        None => errors.push(ValidationError::new("ratio.backend", "is required")),
        Some(backend) if backend.is_empty() => {
            errors.push(ValidationError::new("ratio.backend", "cannot be empty"))
        }
        Some(_) => {}
    }

    check_threshold(errors, "ratio.warning_ratio", config.warning_ratio);
    check_threshold(errors, "ratio.critical_ratio", config.critical_ratio);

    if config.critical_ratio < config.warning_ratio {
        errors.push(ValidationError::new(
            "ratio.critical_ratio",
            format!(
                "must be >= ratio.warning_ratio ({} < {})",
                config.critical_ratio, config.warning_ratio
            ),
        ));
    }
}

/// Validate the availability section.
pub fn validate_availability(
    config: &AvailabilityCheckConfig,
    errors: &mut Vec<ValidationError>,
) {
    check_fraction(errors, "availability.warning_percent", config.warning_percent);
    check_fraction(errors, "availability.critical_percent", config.critical_percent);

    if config.backends.iter().any(|b| b.is_empty()) {
        errors.push(ValidationError::new(
            "availability.backends",
            "contains an empty backend name",
        ));
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate everything the 5xx ratio check and metric reporter read.
pub fn validate_ratio_check(
    stats: &StatsConfig,
    ratio: &RatioCheckConfig,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_stats(stats, &mut errors);
    validate_ratio(ratio, &mut errors);
    finish(errors)
}

/// Validate everything the availability check reads.
pub fn validate_availability_check(
    stats: &StatsConfig,
    availability: &AvailabilityCheckConfig,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_stats(stats, &mut errors);
    validate_availability(availability, &mut errors);
    finish(errors)
}
