//! Chart-ready series points.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use subst_common::{ScoreField, SubstituteEntry};

/// Label of the aggregate point closing the confidence series.
pub const AVERAGE_OTHERS_LABEL: &str = "Average Others";

/// Label of the aggregate point closing the probability series.
pub const OTHERS_LABEL: &str = "Others";

/// Whether a point stands for one substitute or for the hidden rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Entry,
    Aggregate,
}

/// One bar or slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
    pub kind: PointKind,
}

impl SeriesPoint {
    /// Point for a single substitute, labelled with its id.
    pub fn entry(entry: &SubstituteEntry, field: ScoreField) -> Self {
        SeriesPoint {
            label: entry.id().to_string(),
            value: entry.score(field),
            kind: PointKind::Entry,
        }
    }

    pub fn aggregate(label: &str, value: f64) -> Self {
        SeriesPoint {
            label: label.to_string(),
            value,
            kind: PointKind::Aggregate,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        self.kind == PointKind::Aggregate
    }
}

/// Points for `sorted` in order, followed by `aggregate` when present.
pub(crate) fn build_series(
    sorted: &[SubstituteEntry],
    field: ScoreField,
    aggregate: Option<SeriesPoint>,
) -> Vec<SeriesPoint> {
    sorted
        .iter()
        .map(|e| SeriesPoint::entry(e, field))
        .chain(aggregate)
        .collect()
}
