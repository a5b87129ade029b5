//! Error types for Substitute Scout.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Malformed Prediction Reply
//!   Reason: substitute 2002 has no probability in the reply
//!   Fix: The prediction service listed a substitute without scores. ...
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 22,
//!   "category": "input",
//!   "message": "substitute 2002 has no probability in the reply",
//!   "recoverable": false,
//!   "suggested_action": "fix_input",
//!   "context": { "substitute_id": "2002", "field": "probability" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::entry::ScoreField;

/// Result type alias for Substitute Scout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed replies or catalogs handed to us.
    Input,
    /// The prediction service reported a failure.
    Upstream,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Upstream => write!(f, "upstream"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested actions for agents to take in response to errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Retry the operation.
    Retry,
    /// Correct the reply or catalog and resubmit.
    FixInput,
    /// Query a different product.
    ChangeQuery,
    /// Manual intervention required.
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::ChangeQuery => write!(f, "change_query"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
        }
    }
}

/// Unified error type for Substitute Scout.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (20-29)
    #[error("product id must not be empty")]
    EmptyId,

    #[error("substitute {id} is listed more than once")]
    DuplicateSubstitute { id: String },

    #[error("substitute {id} has no {field} in the reply")]
    MissingScore { id: String, field: ScoreField },

    #[error("substitute {id} has a non-numeric {field} in the reply")]
    NonNumericScore { id: String, field: ScoreField },

    #[error("substitute {id} has {field} {value} outside [0, 100]")]
    ScoreOutOfRange {
        id: String,
        field: ScoreField,
        value: f64,
    },

    #[error("reply does not name the queried product")]
    MissingSubject,

    #[error("catalog lists product {code} more than once")]
    DuplicateProduct { code: String },

    // Upstream errors (30-39)
    #[error("{0}")]
    UpstreamFailure(String),

    #[error("product {code} not found")]
    ProductNotFound { code: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 20-29: Input errors
    /// - 30-39: Upstream errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::EmptyId => 20,
            Error::DuplicateSubstitute { .. } => 21,
            Error::MissingScore { .. } => 22,
            Error::ScoreOutOfRange { .. } => 23,
            Error::MissingSubject => 24,
            Error::DuplicateProduct { .. } => 25,
            Error::NonNumericScore { .. } => 26,
            Error::UpstreamFailure(_) => 30,
            Error::ProductNotFound { .. } => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::EmptyId
            | Error::DuplicateSubstitute { .. }
            | Error::MissingScore { .. }
            | Error::NonNumericScore { .. }
            | Error::ScoreOutOfRange { .. }
            | Error::MissingSubject
            | Error::DuplicateProduct { .. } => ErrorCategory::Input,

            Error::UpstreamFailure(_) | Error::ProductNotFound { .. } => ErrorCategory::Upstream,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable without
    /// changing the input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Input: the same bytes will fail the same way
            Error::EmptyId
            | Error::DuplicateSubstitute { .. }
            | Error::MissingScore { .. }
            | Error::NonNumericScore { .. }
            | Error::ScoreOutOfRange { .. }
            | Error::MissingSubject
            | Error::DuplicateProduct { .. } => false,

            Error::UpstreamFailure(_) => true, // Service may recover
            Error::ProductNotFound { .. } => false,

            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns the suggested action for agents.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::EmptyId
            | Error::DuplicateSubstitute { .. }
            | Error::MissingScore { .. }
            | Error::NonNumericScore { .. }
            | Error::ScoreOutOfRange { .. }
            | Error::MissingSubject
            | Error::DuplicateProduct { .. } => SuggestedAction::FixInput,

            Error::UpstreamFailure(_) => SuggestedAction::Retry,
            Error::ProductNotFound { .. } => SuggestedAction::ChangeQuery,

            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::EmptyId => "Every product and substitute needs a non-empty code.",
            Error::DuplicateSubstitute { .. } => {
                "The reply lists a substitute twice. Deduplicate the substitutes array."
            }
            Error::MissingScore { .. } => {
                "The prediction service listed a substitute without scores. Re-query or report the reply."
            }
            Error::NonNumericScore { .. } => {
                "Scores must be JSON numbers. Check the reply's confidences and probabilities maps."
            }
            Error::ScoreOutOfRange { .. } => {
                "Scores are percentages. Check that the service reports values in [0, 100]."
            }
            Error::MissingSubject => {
                "Pass --product, or make sure the reply carries product_id."
            }
            Error::DuplicateProduct { .. } => {
                "Each catalog record must have a unique code."
            }

            Error::UpstreamFailure(_) => {
                "The prediction service reported an error. Retry, or check that the nomenclature is loaded."
            }
            Error::ProductNotFound { .. } => {
                "The product is not in the catalog. Check the code and try again."
            }

            Error::Io(_) => "Check the path and permissions, then retry.",
            Error::Json(_) => {
                "Invalid JSON. Check syntax with 'jq . <file>' and resubmit."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::EmptyId => "Empty Product Code",
            Error::DuplicateSubstitute { .. } => "Duplicate Substitute",
            Error::MissingScore { .. } | Error::NonNumericScore { .. } => {
                "Malformed Prediction Reply"
            }
            Error::ScoreOutOfRange { .. } => "Score Out of Range",
            Error::MissingSubject => "Unknown Subject Product",
            Error::DuplicateProduct { .. } => "Duplicate Catalog Product",

            Error::UpstreamFailure(_) => "Prediction Failed",
            Error::ProductNotFound { .. } => "Product Not Found",

            Error::Io(_) => "I/O Error",
            Error::Json(_) => "Invalid JSON",
        }
    }
}

/// Machine-readable error form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for agents.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., substitute id, field).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::DuplicateSubstitute { id } => {
                context.insert("substitute_id".to_string(), serde_json::json!(id));
            }
            Error::MissingScore { id, field } | Error::NonNumericScore { id, field } => {
                context.insert("substitute_id".to_string(), serde_json::json!(id));
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::ScoreOutOfRange { id, field, value } => {
                context.insert("substitute_id".to_string(), serde_json::json!(id));
                context.insert("field".to_string(), serde_json::json!(field));
                context.insert("value".to_string(), serde_json::json!(value));
            }
            Error::DuplicateProduct { code } | Error::ProductNotFound { code } => {
                context.insert("product_id".to_string(), serde_json::json!(code));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::EmptyId.code(), 20);
        assert_eq!(Error::MissingSubject.code(), 24);
        assert_eq!(Error::UpstreamFailure("boom".into()).code(), 30);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(Error::EmptyId.category(), ErrorCategory::Input);
        assert_eq!(
            Error::ProductNotFound { code: "1".into() }.category(),
            ErrorCategory::Upstream
        );
    }

    #[test]
    fn test_error_recoverable() {
        assert!(Error::Io(std::io::Error::other("disk")).is_recoverable());
        assert!(!Error::EmptyId.is_recoverable());
        assert!(Error::UpstreamFailure("x".into()).is_recoverable());
        assert!(!Error::ProductNotFound { code: "1".into() }.is_recoverable());
    }

    #[test]
    fn test_suggested_action() {
        assert_eq!(
            Error::MissingScore {
                id: "2".into(),
                field: ScoreField::Confidence
            }
            .suggested_action(),
            SuggestedAction::FixInput
        );
        assert_eq!(
            Error::ProductNotFound { code: "1".into() }.suggested_action(),
            SuggestedAction::ChangeQuery
        );
        assert_eq!(
            Error::NonNumericScore {
                id: "2".into(),
                field: ScoreField::Probability
            }
            .suggested_action(),
            SuggestedAction::FixInput
        );
    }

    #[test]
    fn upstream_message_is_verbatim() {
        let err = Error::UpstreamFailure("Product not found".into());
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn test_structured_error_from_error() {
        let err = Error::MissingScore {
            id: "2002".into(),
            field: ScoreField::Probability,
        };
        let structured = StructuredError::from(&err);

        assert_eq!(structured.code, 22);
        assert_eq!(structured.category, ErrorCategory::Input);
        assert!(!structured.recoverable);
        assert_eq!(structured.suggested_action, SuggestedAction::FixInput);
        assert_eq!(
            structured.context.get("substitute_id"),
            Some(&serde_json::json!("2002"))
        );
        assert_eq!(
            structured.context.get("field"),
            Some(&serde_json::json!("probability"))
        );
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::UpstreamFailure("service down".into());
        let json = StructuredError::from(&err).with_context("attempt", 2).to_json();

        assert!(json.contains(r#""code":30"#));
        assert!(json.contains(r#""category":"upstream""#));
        assert!(json.contains(r#""recoverable":true"#));
        assert!(json.contains(r#""suggested_action":"retry""#));
        assert!(json.contains(r#""attempt":2"#));
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::DuplicateProduct { code: "77".into() };
        let formatted = format_error_human(&err, false);

        assert!(formatted.contains("Duplicate Catalog Product"));
        assert!(formatted.contains("catalog lists product 77 more than once"));
        assert!(formatted.contains("unique code"));
        assert!(!formatted.contains("\x1b["));
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Input.to_string(), "input");
        assert_eq!(ErrorCategory::Upstream.to_string(), "upstream");
    }

    #[test]
    fn test_suggested_action_display() {
        assert_eq!(SuggestedAction::FixInput.to_string(), "fix_input");
        assert_eq!(SuggestedAction::ChangeQuery.to_string(), "change_query");
    }
}
