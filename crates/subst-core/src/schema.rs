//! JSON Schema generation for reply, decision and config types.
//!
//! ```bash
//! subst-core schema --list
//! subst-core schema PredictionReply
//! subst-core schema --all
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::decision::{DisplayDecision, PointKind, SeriesPoint};
pub use crate::predict::ProductRecord;
pub use subst_common::{
    PredictionReply, PredictionResponse, PredictionResult, ProductId, ScoreField,
    ServiceFailure, SubstituteEntry,
};
pub use subst_config::{Config, ScoringParams, SummaryPolicy};

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Wire types
        ("ProductId", "Product code (string or integer on the wire)"),
        (
            "PredictionReply",
            "Prediction service reply: success payload or {\"error\": ...}",
        ),
        ("PredictionResponse", "Successful reply before validation"),
        ("ServiceFailure", "Service-reported failure"),
        // Result types
        ("ScoreField", "Score selector (confidence, probability)"),
        ("SubstituteEntry", "One substitute with its two scores"),
        ("PredictionResult", "Validated result for one queried product"),
        // Decision types
        ("PointKind", "Series point kind (entry or aggregate)"),
        ("SeriesPoint", "One labelled value in a chart series"),
        (
            "DisplayDecision",
            "Shown/hidden partition, aggregates, sorted lists and series",
        ),
        // Catalog and config types
        ("ProductRecord", "Catalog row used by the local predictor"),
        ("SummaryPolicy", "Display thresholds (policy.json)"),
        ("ScoringParams", "Local predictor weights (scoring.json)"),
        ("Config", "Combined policy and scoring configuration"),
    ]
}

/// Generate JSON Schema for a type by name; `None` if the name is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "ProductId" => schema_for!(ProductId),
        "PredictionReply" => schema_for!(PredictionReply),
        "PredictionResponse" => schema_for!(PredictionResponse),
        "ServiceFailure" => schema_for!(ServiceFailure),
        "ScoreField" => schema_for!(ScoreField),
        "SubstituteEntry" => schema_for!(SubstituteEntry),
        "PredictionResult" => schema_for!(PredictionResult),
        "PointKind" => schema_for!(PointKind),
        "SeriesPoint" => schema_for!(SeriesPoint),
        "DisplayDecision" => schema_for!(DisplayDecision),
        "ProductRecord" => schema_for!(ProductRecord),
        "SummaryPolicy" => schema_for!(SummaryPolicy),
        "ScoringParams" => schema_for!(ScoringParams),
        "Config" => schema_for!(Config),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|s| (name.to_string(), s)))
        .collect()
}
