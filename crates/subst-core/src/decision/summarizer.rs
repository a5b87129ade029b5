//! Shown/hidden partitioning and "Others" rollups.
//!
//! Rules, in order:
//! - `show_all`, or a result no larger than the policy's small-result limit:
//!   every entry is shown, nothing is hidden.
//! - otherwise an entry is shown iff `confidence >= min_confidence` and
//!   `probability > min_probability`; the rest are hidden.
//!
//! Both partitions keep the result's order. The hidden entries roll up into
//! a mean confidence and a summed probability, which close the two series
//! when they carry information: the confidence aggregate whenever anything
//! is hidden, the probability aggregate only when its sum is positive.

use schemars::JsonSchema;
use serde::Serialize;
use std::cmp::Ordering;
use subst_common::{PredictionResult, ScoreField, SubstituteEntry};
use subst_config::SummaryPolicy;
use subst_math::Rollup;

use super::series::{build_series, SeriesPoint, AVERAGE_OTHERS_LABEL, OTHERS_LABEL};

/// Everything a renderer needs to draw one result.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DisplayDecision {
    show_all: bool,
    shown: Vec<SubstituteEntry>,
    hidden: Vec<SubstituteEntry>,
    others_confidence_avg: f64,
    others_probability_sum: f64,
    confidence_list: Vec<SubstituteEntry>,
    probability_list: Vec<SubstituteEntry>,
    confidence_series: Vec<SeriesPoint>,
    probability_series: Vec<SeriesPoint>,
    toggle_visible: bool,
}

impl DisplayDecision {
    /// The flag this decision was computed with.
    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// Entries drawn individually, in result order.
    pub fn shown(&self) -> &[SubstituteEntry] {
        &self.shown
    }

    /// Entries folded into the aggregate, in result order.
    pub fn hidden(&self) -> &[SubstituteEntry] {
        &self.hidden
    }

    /// Mean confidence of the hidden entries; 0 when none are hidden.
    pub fn others_confidence_avg(&self) -> f64 {
        self.others_confidence_avg
    }

    /// Summed probability of the hidden entries; 0 when none are hidden.
    pub fn others_probability_sum(&self) -> f64 {
        self.others_probability_sum
    }

    /// Shown entries, highest confidence first.
    pub fn confidence_list(&self) -> &[SubstituteEntry] {
        &self.confidence_list
    }

    /// Shown entries, highest probability first.
    pub fn probability_list(&self) -> &[SubstituteEntry] {
        &self.probability_list
    }

    pub fn confidence_series(&self) -> &[SeriesPoint] {
        &self.confidence_series
    }

    pub fn probability_series(&self) -> &[SeriesPoint] {
        &self.probability_series
    }

    /// Whether a "show all" control has anything to reveal.
    pub fn toggle_visible(&self) -> bool {
        self.toggle_visible
    }
}

/// Applies one `SummaryPolicy` to prediction results.
#[derive(Debug, Clone, Default)]
pub struct ResultSummarizer {
    policy: SummaryPolicy,
}

impl ResultSummarizer {
    pub fn new(policy: SummaryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SummaryPolicy {
        &self.policy
    }

    /// Derive the display decision for `result`.
    pub fn summarize(&self, result: &PredictionResult, show_all: bool) -> DisplayDecision {
        let entries = result.entries();

        let (shown, hidden): (Vec<SubstituteEntry>, Vec<SubstituteEntry>) =
            if show_all || self.policy.keeps_everything(entries.len()) {
                (entries.to_vec(), Vec::new())
            } else {
                entries
                    .iter()
                    .cloned()
                    .partition(|e| self.policy.passes(e.confidence(), e.probability()))
            };

        let confidence_rollup: Rollup = hidden.iter().map(SubstituteEntry::confidence).collect();
        let probability_rollup: Rollup = hidden.iter().map(SubstituteEntry::probability).collect();
        let others_confidence_avg = confidence_rollup.mean();
        let others_probability_sum = probability_rollup.sum();

        let confidence_list = sorted_desc(&shown, ScoreField::Confidence);
        let probability_list = sorted_desc(&shown, ScoreField::Probability);

        let confidence_aggregate = (!hidden.is_empty())
            .then(|| SeriesPoint::aggregate(AVERAGE_OTHERS_LABEL, others_confidence_avg));
        let probability_aggregate = (others_probability_sum > 0.0)
            .then(|| SeriesPoint::aggregate(OTHERS_LABEL, others_probability_sum));

        let confidence_series =
            build_series(&confidence_list, ScoreField::Confidence, confidence_aggregate);
        let probability_series =
            build_series(&probability_list, ScoreField::Probability, probability_aggregate);

        let toggle_visible = !hidden.is_empty();

        DisplayDecision {
            show_all,
            shown,
            hidden,
            others_confidence_avg,
            others_probability_sum,
            confidence_list,
            probability_list,
            confidence_series,
            probability_series,
            toggle_visible,
        }
    }
}

/// Summarize with the built-in policy.
pub fn summarize(result: &PredictionResult, show_all: bool) -> DisplayDecision {
    ResultSummarizer::default().summarize(result, show_all)
}

/// Summarize with an explicit policy.
pub fn summarize_with(
    policy: &SummaryPolicy,
    result: &PredictionResult,
    show_all: bool,
) -> DisplayDecision {
    ResultSummarizer::new(policy.clone()).summarize(result, show_all)
}

/// Stable descending sort; ties keep result order.
fn sorted_desc(entries: &[SubstituteEntry], field: ScoreField) -> Vec<SubstituteEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        b.score(field)
            .partial_cmp(&a.score(field))
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::PointKind;
    use subst_common::ProductId;

    fn entry(id: &str, c: f64, p: f64) -> SubstituteEntry {
        SubstituteEntry::new(ProductId::new(id).unwrap(), c, p).unwrap()
    }

    fn result(entries: Vec<SubstituteEntry>) -> PredictionResult {
        PredictionResult::new(ProductId::new("P").unwrap(), entries).unwrap()
    }

    fn ids(entries: &[SubstituteEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id().as_str()).collect()
    }

    fn labels(series: &[SeriesPoint]) -> Vec<&str> {
        series.iter().map(|p| p.label.as_str()).collect()
    }

    #[test]
    fn small_result_shows_everything() {
        let r = result(vec![entry("A", 90.0, 50.0), entry("B", 30.0, 60.0)]);
        let d = summarize(&r, false);
        assert_eq!(ids(d.shown()), vec!["A", "B"]);
        assert!(d.hidden().is_empty());
        assert!(!d.toggle_visible());
        assert_eq!(labels(d.confidence_series()), vec!["A", "B"]);
        assert_eq!(labels(d.probability_series()), vec!["B", "A"]);
    }

    #[test]
    fn four_entries_apply_thresholds() {
        let r = result(vec![
            entry("A", 40.0, 10.0),
            entry("B", 39.9, 80.0),
            entry("C", 40.0, 10.1),
            entry("D", 95.0, 70.0),
        ]);
        let d = summarize(&r, false);
        assert_eq!(ids(d.shown()), vec!["C", "D"]);
        assert_eq!(ids(d.hidden()), vec!["A", "B"]);
        assert!((d.others_confidence_avg() - 39.95).abs() < 1e-9);
        assert!((d.others_probability_sum() - 90.0).abs() < 1e-9);
        assert_eq!(ids(d.confidence_list()), vec!["D", "C"]);
        assert_eq!(labels(d.confidence_series()), vec!["D", "C", AVERAGE_OTHERS_LABEL]);
        assert_eq!(labels(d.probability_series()), vec!["D", "C", OTHERS_LABEL]);
        assert!(d.toggle_visible());
    }

    #[test]
    fn zero_probability_others_are_not_drawn() {
        let r = result(vec![
            entry("A", 80.0, 60.0),
            entry("B", 70.0, 40.0),
            entry("C", 10.0, 0.0),
            entry("D", 5.0, 0.0),
        ]);
        let d = summarize(&r, false);
        assert_eq!(d.others_probability_sum(), 0.0);
        assert_eq!(d.others_confidence_avg(), 7.5);
        assert_eq!(labels(d.probability_series()), vec!["A", "B"]);
        assert_eq!(
            d.confidence_series().last().map(|p| p.kind),
            Some(PointKind::Aggregate)
        );
    }

    #[test]
    fn show_all_overrides_filter() {
        let r = result(vec![
            entry("A", 10.0, 1.0),
            entry("B", 20.0, 2.0),
            entry("C", 30.0, 3.0),
            entry("D", 40.0, 4.0),
        ]);
        let d = summarize(&r, true);
        assert!(d.show_all());
        assert_eq!(ids(d.shown()), vec!["A", "B", "C", "D"]);
        assert!(d.hidden().is_empty());
        assert_eq!(d.others_confidence_avg(), 0.0);
        assert_eq!(ids(d.confidence_list()), vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn ties_keep_result_order() {
        let r = result(vec![
            entry("A", 50.0, 20.0),
            entry("B", 50.0, 20.0),
            entry("C", 60.0, 20.0),
        ]);
        let d = summarize(&r, false);
        assert_eq!(ids(d.confidence_list()), vec!["C", "A", "B"]);
        assert_eq!(ids(d.probability_list()), vec!["A", "B", "C"]);
    }

    #[test]
    fn custom_policy_changes_limit() {
        let policy = SummaryPolicy {
            small_result_limit: 0,
            ..SummaryPolicy::default()
        };
        let r = result(vec![entry("A", 90.0, 50.0), entry("B", 30.0, 60.0)]);
        let d = summarize_with(&policy, &r, false);
        assert_eq!(ids(d.shown()), vec!["A"]);
        assert_eq!(ids(d.hidden()), vec!["B"]);
    }

    #[test]
    fn serializes_every_field() {
        let d = summarize(&result(vec![]), false);
        let json = serde_json::to_value(&d).unwrap();
        for key in [
            "show_all",
            "shown",
            "hidden",
            "others_confidence_avg",
            "others_probability_sum",
            "confidence_list",
            "probability_list",
            "confidence_series",
            "probability_series",
            "toggle_visible",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
