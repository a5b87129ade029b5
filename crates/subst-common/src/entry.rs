//! Substitute entries and prediction results.
//!
//! Both types validate on construction: once a `PredictionResult` exists,
//! every entry has a non-empty id unique within the result and two finite
//! scores in `[0, 100]`. Downstream code never re-checks these.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::id::ProductId;

/// Lowest admissible score.
pub const SCORE_MIN: f64 = 0.0;

/// Highest admissible score.
pub const SCORE_MAX: f64 = 100.0;

/// Which of the two per-substitute scores a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Confidence,
    Probability,
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreField::Confidence => write!(f, "confidence"),
            ScoreField::Probability => write!(f, "probability"),
        }
    }
}

/// A candidate replacement product with its two scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawEntry")]
pub struct SubstituteEntry {
    id: ProductId,
    confidence: f64,
    probability: f64,
}

/// Unvalidated wire form of a `SubstituteEntry`.
#[derive(Deserialize, JsonSchema)]
struct RawEntry {
    id: ProductId,
    confidence: f64,
    probability: f64,
}

impl TryFrom<RawEntry> for SubstituteEntry {
    type Error = Error;

    fn try_from(raw: RawEntry) -> Result<Self> {
        SubstituteEntry::new(raw.id, raw.confidence, raw.probability)
    }
}

impl SubstituteEntry {
    /// Build an entry, rejecting non-finite or out-of-range scores.
    pub fn new(id: ProductId, confidence: f64, probability: f64) -> Result<Self> {
        check_score(&id, ScoreField::Confidence, confidence)?;
        check_score(&id, ScoreField::Probability, probability)?;
        Ok(SubstituteEntry {
            id,
            confidence,
            probability,
        })
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Model certainty in this substitute, 0..=100.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Estimated likelihood of acceptance, 0..=100.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Read one score by field.
    pub fn score(&self, field: ScoreField) -> f64 {
        match field {
            ScoreField::Confidence => self.confidence,
            ScoreField::Probability => self.probability,
        }
    }
}

fn check_score(id: &ProductId, field: ScoreField, value: f64) -> Result<()> {
    if !value.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&value) {
        return Err(Error::ScoreOutOfRange {
            id: id.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

/// The immutable answer to one prediction query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawResult")]
pub struct PredictionResult {
    subject_id: ProductId,
    entries: Vec<SubstituteEntry>,
}

#[derive(Deserialize, JsonSchema)]
struct RawResult {
    subject_id: ProductId,
    #[serde(default)]
    entries: Vec<SubstituteEntry>,
}

impl TryFrom<RawResult> for PredictionResult {
    type Error = Error;

    fn try_from(raw: RawResult) -> Result<Self> {
        PredictionResult::new(raw.subject_id, raw.entries)
    }
}

impl PredictionResult {
    /// Build a result, rejecting duplicate substitute ids.
    ///
    /// Entry order is preserved; it is the order the summarizer uses when it
    /// shows or hides entries without sorting.
    pub fn new(subject_id: ProductId, entries: Vec<SubstituteEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id()) {
                return Err(Error::DuplicateSubstitute {
                    id: entry.id().to_string(),
                });
            }
        }
        Ok(PredictionResult {
            subject_id,
            entries,
        })
    }

    /// A valid "no substitutes found" result.
    pub fn empty(subject_id: ProductId) -> Self {
        PredictionResult {
            subject_id,
            entries: Vec::new(),
        }
    }

    pub fn subject_id(&self) -> &ProductId {
        &self.subject_id
    }

    pub fn entries(&self) -> &[SubstituteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
