//! Weights for the local prediction engine.
//!
//! Confidence for a candidate is the price score plus attribute bonuses,
//! scaled down when the candidate comes from a sibling family. Probabilities
//! are a tempered softmax over those confidences.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, ValidationResult};

/// Contents of scoring.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringParams {
    pub schema_version: String,

    /// Softmax temperature applied to confidences.
    pub temperature: f64,

    /// Maximum points from price similarity.
    pub price_weight: f64,

    pub brand_weight: f64,
    pub origin_weight: f64,
    pub premium_weight: f64,

    /// Multiplier for candidates outside the product's own family.
    pub cross_family_multiplier: f64,

    /// Candidate/base price ratio at or below which price scores zero.
    pub price_ratio_low: f64,

    /// Candidate/base price ratio at or above which price scores zero.
    pub price_ratio_high: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            temperature: 20.0,
            price_weight: 40.0,
            brand_weight: 40.0,
            origin_weight: 10.0,
            premium_weight: 10.0,
            cross_family_multiplier: 0.5,
            price_ratio_low: 0.25,
            price_ratio_high: 2.0,
        }
    }
}

impl ScoringParams {
    /// Load scoring parameters from a JSON file.
    pub fn from_file(path: &std::path::Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse scoring parameters from a JSON string.
    pub fn parse_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Highest confidence a same-family candidate can reach.
    pub fn max_confidence(&self) -> f64 {
        self.price_weight + self.brand_weight + self.origin_weight + self.premium_weight
    }
}
