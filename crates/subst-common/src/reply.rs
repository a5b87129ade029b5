//! Prediction service reply shape.
//!
//! A successful reply lists substitute ids and carries two score maps keyed
//! by id:
//!
//! ```json
//! {
//!   "product_id": 1042,
//!   "substitutes": [2001, 2002],
//!   "confidences": {"2001": 72.5, "2002": 31.0},
//!   "probabilities": {"2001": 64.1, "2002": 35.9}
//! }
//! ```
//!
//! A failed query yields `{"error": "..."}` instead, possibly alongside other
//! keys. Any object with a string `error` is a failure; the message never
//! reaches the summarizer and is surfaced to the user verbatim.
//!
//! Score values are kept as raw JSON until `into_result`, so a `null` or a
//! string score is reported against the substitute and field it belongs to.

use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::entry::{PredictionResult, ScoreField, SubstituteEntry};
use crate::error::{Error, Result};
use crate::id::ProductId;

/// Either a successful prediction or a service-reported failure.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum PredictionReply {
    Failure(ServiceFailure),
    Success(PredictionResponse),
}

impl<'de> Deserialize<'de> for PredictionReply {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut object = Map::deserialize(deserializer)?;
        match object.remove("error") {
            Some(Value::String(error)) => {
                return Ok(PredictionReply::Failure(ServiceFailure { error }))
            }
            Some(other) => {
                object.insert("error".to_string(), other);
            }
            None => {}
        }
        serde_json::from_value(Value::Object(object))
            .map(PredictionReply::Success)
            .map_err(D::Error::custom)
    }
}

/// `{"error": "..."}` as sent by the service. Other keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceFailure {
    pub error: String,
}

/// Raw success payload, not yet validated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResponse {
    /// The queried product, when the service echoes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,

    /// Substitute ids in service order.
    pub substitutes: Vec<ProductId>,

    /// Confidence per substitute id, as sent.
    #[serde(default)]
    pub confidences: BTreeMap<ProductId, Value>,

    /// Probability per substitute id, as sent.
    #[serde(default)]
    pub probabilities: BTreeMap<ProductId, Value>,
}

impl PredictionReply {
    /// Service-side failure with a message.
    pub fn failure(message: impl Into<String>) -> Self {
        PredictionReply::Failure(ServiceFailure {
            error: message.into(),
        })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, PredictionReply::Failure(_))
    }

    /// Translate the reply into a validated result.
    ///
    /// `queried` names the subject when the reply does not echo one. A
    /// failure reply becomes `Error::UpstreamFailure` carrying the service
    /// message unchanged.
    pub fn into_result(self, queried: Option<&ProductId>) -> Result<PredictionResult> {
        match self {
            PredictionReply::Failure(failure) => Err(Error::UpstreamFailure(failure.error)),
            PredictionReply::Success(response) => response.into_result(queried),
        }
    }
}

impl PredictionResponse {
    /// Empty response about `subject`.
    pub fn new(subject: ProductId) -> Self {
        PredictionResponse {
            product_id: Some(subject),
            ..Default::default()
        }
    }

    /// List `id` with both scores.
    pub fn push(&mut self, id: ProductId, confidence: f64, probability: f64) {
        self.confidences.insert(id.clone(), Value::from(confidence));
        self.probabilities.insert(id.clone(), Value::from(probability));
        self.substitutes.push(id);
    }

    /// Numeric confidence for `id`, if present.
    pub fn confidence(&self, id: &ProductId) -> Option<f64> {
        self.confidences.get(id).and_then(Value::as_f64)
    }

    /// Numeric probability for `id`, if present.
    pub fn probability(&self, id: &ProductId) -> Option<f64> {
        self.probabilities.get(id).and_then(Value::as_f64)
    }

    /// Validate and convert into a `PredictionResult`.
    ///
    /// Every id listed in `substitutes` must have a number in both maps;
    /// absent and `null` scores are `MissingScore`, other values are
    /// `NonNumericScore`. Map keys that are not listed are ignored.
    pub fn into_result(self, queried: Option<&ProductId>) -> Result<PredictionResult> {
        let subject = match (self.product_id, queried) {
            (Some(echoed), _) => echoed,
            (None, Some(queried)) => queried.clone(),
            (None, None) => return Err(Error::MissingSubject),
        };

        let mut entries = Vec::with_capacity(self.substitutes.len());
        for id in self.substitutes {
            let confidence = lookup(&self.confidences, &id, ScoreField::Confidence)?;
            let probability = lookup(&self.probabilities, &id, ScoreField::Probability)?;
            entries.push(SubstituteEntry::new(id, confidence, probability)?);
        }

        PredictionResult::new(subject, entries)
    }
}

fn lookup(scores: &BTreeMap<ProductId, Value>, id: &ProductId, field: ScoreField) -> Result<f64> {
    match scores.get(id) {
        None | Some(Value::Null) => Err(Error::MissingScore {
            id: id.to_string(),
            field,
        }),
        Some(value) => value.as_f64().ok_or_else(|| Error::NonNumericScore {
            id: id.to_string(),
            field,
        }),
    }
}

impl From<&PredictionResult> for PredictionResponse {
    fn from(result: &PredictionResult) -> Self {
        let mut response = PredictionResponse::new(result.subject_id().clone());
        for entry in result.entries() {
            response.push(entry.id().clone(), entry.confidence(), entry.probability());
        }
        response
    }
}
