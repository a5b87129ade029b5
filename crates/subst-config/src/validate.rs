//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::policy::SummaryPolicy;
use crate::scoring::ScoringParams;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

fn check_version(actual: &str) -> ValidationResult<()> {
    if actual != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

fn check_percent(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in [0, 100], got {}", value),
        });
    }
    Ok(())
}

fn check_weight(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be finite and non-negative, got {}", value),
        });
    }
    Ok(())
}

/// Validate policy configuration semantically.
pub fn validate_policy(policy: &SummaryPolicy) -> ValidationResult<()> {
    check_version(&policy.schema_version)?;
    check_percent("min_confidence", policy.min_confidence)?;
    check_percent("min_probability", policy.min_probability)?;
    Ok(())
}

/// Validate scoring configuration semantically.
pub fn validate_scoring(scoring: &ScoringParams) -> ValidationResult<()> {
    check_version(&scoring.schema_version)?;

    if !scoring.temperature.is_finite() || scoring.temperature <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "temperature".to_string(),
            message: format!("Must be positive, got {}", scoring.temperature),
        });
    }

    check_weight("price_weight", scoring.price_weight)?;
    check_weight("brand_weight", scoring.brand_weight)?;
    check_weight("origin_weight", scoring.origin_weight)?;
    check_weight("premium_weight", scoring.premium_weight)?;

    if !(0.0..=1.0).contains(&scoring.cross_family_multiplier) {
        return Err(ValidationError::InvalidValue {
            field: "cross_family_multiplier".to_string(),
            message: format!("Must be in [0, 1], got {}", scoring.cross_family_multiplier),
        });
    }

    // Engine confidences are reported on the 0-100 scale.
    if scoring.max_confidence() > 100.0 {
        return Err(ValidationError::SemanticError(format!(
            "Weights must sum to at most 100, got {} (price={}, brand={}, origin={}, premium={})",
            scoring.max_confidence(),
            scoring.price_weight,
            scoring.brand_weight,
            scoring.origin_weight,
            scoring.premium_weight,
        )));
    }

    let low = scoring.price_ratio_low;
    let high = scoring.price_ratio_high;
    if !(low.is_finite() && high.is_finite() && 0.0 <= low && low < 1.0 && 1.0 < high) {
        return Err(ValidationError::SemanticError(format!(
            "Price ratio bounds must satisfy 0 <= low < 1 < high, got low={}, high={}",
            low, high
        )));
    }

    Ok(())
}
