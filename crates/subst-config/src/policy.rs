//! Display policy: when entries are shown individually and when they are
//! folded into the "Others" aggregate.
//!
//! The built-in values keep every entry of a small result (three or fewer)
//! and otherwise show an entry only when `confidence >= 40` and
//! `probability > 10`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, ValidationResult};

/// Results at or below this size are always shown in full.
pub const DEFAULT_SMALL_RESULT_LIMIT: usize = 3;

/// Inclusive confidence floor for a shown entry.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 40.0;

/// Exclusive probability floor for a shown entry.
pub const DEFAULT_MIN_PROBABILITY: f64 = 10.0;

/// Contents of policy.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SummaryPolicy {
    pub schema_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Results with at most this many entries skip filtering.
    pub small_result_limit: usize,

    /// Shown entries need `confidence >= min_confidence`.
    pub min_confidence: f64,

    /// Shown entries need `probability > min_probability`.
    pub min_probability: f64,
}

impl Default for SummaryPolicy {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            small_result_limit: DEFAULT_SMALL_RESULT_LIMIT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_probability: DEFAULT_MIN_PROBABILITY,
        }
    }
}

impl SummaryPolicy {
    /// Load policy from a JSON file.
    pub fn from_file(path: &std::path::Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse policy from a JSON string.
    pub fn parse_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Whether a result of `len` entries is shown without filtering.
    pub fn keeps_everything(&self, len: usize) -> bool {
        len <= self.small_result_limit
    }

    /// Whether an entry with these scores is shown individually.
    ///
    /// Confidence is compared inclusively, probability strictly.
    pub fn passes(&self, confidence: f64, probability: f64) -> bool {
        confidence >= self.min_confidence && probability > self.min_probability
    }
}
