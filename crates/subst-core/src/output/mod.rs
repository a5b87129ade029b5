//! Rendering of display decisions and errors.
//!
//! Renderers return strings; the binary decides where they go. Payloads go
//! to stdout, errors to stderr.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use subst_common::error::{format_error_human, StructuredError};
use subst_common::{Error, OutputFormat, ProductId, SCHEMA_VERSION};

use crate::decision::{DisplayDecision, SeriesPoint};

/// JSON payload for one rendered decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionEnvelope<'a> {
    pub schema_version: &'static str,
    pub run_id: &'a str,
    pub generated_at: DateTime<Utc>,
    pub subject_id: &'a ProductId,
    pub decision: &'a DisplayDecision,
}

impl<'a> DecisionEnvelope<'a> {
    pub fn new(run_id: &'a str, subject_id: &'a ProductId, decision: &'a DisplayDecision) -> Self {
        DecisionEnvelope {
            schema_version: SCHEMA_VERSION,
            run_id,
            generated_at: Utc::now(),
            subject_id,
            decision,
        }
    }
}

/// Render `decision` in `format`. `Exitcode` renders nothing.
pub fn render_decision(
    format: OutputFormat,
    run_id: &str,
    subject_id: &ProductId,
    decision: &DisplayDecision,
) -> Result<Option<String>, serde_json::Error> {
    let out = match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(&DecisionEnvelope::new(
            run_id, subject_id, decision,
        ))?),
        OutputFormat::Md => Some(render_markdown(subject_id, decision)),
        OutputFormat::Summary => Some(render_summary(subject_id, decision)),
        OutputFormat::Exitcode => None,
    };
    Ok(out)
}

/// One-line summary: `<subject>: N shown, M hidden (others avg conf X, others prob Y)`.
pub fn render_summary(subject_id: &ProductId, decision: &DisplayDecision) -> String {
    format!(
        "{}: {} shown, {} hidden (others avg conf {:.1}, others prob {:.1})",
        subject_id,
        decision.shown().len(),
        decision.hidden().len(),
        decision.others_confidence_avg(),
        decision.others_probability_sum()
    )
}

/// Markdown report with one table per series.
pub fn render_markdown(subject_id: &ProductId, decision: &DisplayDecision) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Substitutes for {}", subject_id);
    out.push('\n');

    if decision.shown().is_empty() && decision.hidden().is_empty() {
        out.push_str("No substitutes found.\n");
        return out;
    }

    write_table(&mut out, "By confidence", "Confidence", decision.confidence_series());
    out.push('\n');
    write_table(&mut out, "By probability", "Probability", decision.probability_series());

    if decision.toggle_visible() {
        out.push('\n');
        let _ = writeln!(
            out,
            "_{} more hidden; rerun with `--show-all` to list every substitute._",
            decision.hidden().len()
        );
    }
    out
}

fn write_table(out: &mut String, title: &str, column: &str, series: &[SeriesPoint]) {
    let _ = writeln!(out, "## {}", title);
    out.push('\n');
    let _ = writeln!(out, "| # | Substitute | {} |", column);
    out.push_str("|---|---|---|\n");

    let mut rank = 0;
    for point in series {
        if point.is_aggregate() {
            let _ = writeln!(out, "| | _{}_ | {:.1} |", escape_cell(&point.label), point.value);
        } else {
            rank += 1;
            let _ = writeln!(
                out,
                "| {} | {} | {:.1} |",
                rank,
                escape_cell(&point.label),
                point.value
            );
        }
    }
}

/// Escape `|` so a label cannot split a table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    schema_version: &'static str,
    run_id: &'a str,
    generated_at: DateTime<Utc>,
    status: &'static str,
    error: StructuredError,
}

/// Render `err` for stderr.
///
/// `Exitcode` is silent except for upstream failures, whose message is
/// always printed verbatim.
pub fn render_error(format: OutputFormat, run_id: &str, err: &Error, use_color: bool) -> Option<String> {
    match format {
        OutputFormat::Json => {
            let envelope = ErrorEnvelope {
                schema_version: SCHEMA_VERSION,
                run_id,
                generated_at: Utc::now(),
                status: "error",
                error: StructuredError::from(err),
            };
            Some(
                serde_json::to_string_pretty(&envelope)
                    .unwrap_or_else(|_| StructuredError::from(err).to_json()),
            )
        }
        OutputFormat::Summary => Some(format!("[{}] error: {}", run_id, err)),
        OutputFormat::Md => Some(format_error_human(err, use_color)),
        OutputFormat::Exitcode => {
            matches!(err, Error::UpstreamFailure(_)).then(|| err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::summarize;
    use subst_common::{PredictionResult, SubstituteEntry};

    fn five() -> PredictionResult {
        let entries = [
            ("A", 20.0, 5.0),
            ("B", 35.0, 30.0),
            ("C", 45.0, 15.0),
            ("D", 80.0, 8.0),
            ("E", 10.0, 42.0),
        ]
        .into_iter()
        .map(|(id, c, p)| SubstituteEntry::new(ProductId::new(id).unwrap(), c, p).unwrap())
        .collect();
        PredictionResult::new(ProductId::new("P").unwrap(), entries).unwrap()
    }

    #[test]
    fn summary_line() {
        let r = five();
        let d = summarize(&r, false);
        let line = render_summary(r.subject_id(), &d);
        // mean is 36.25, so only the integer part is pinned
        assert!(line.starts_with("P: 1 shown, 4 hidden (others avg conf 36."));
        assert!(line.ends_with(", others prob 85.0)"));
    }

    #[test]
    fn json_envelope_fields() {
        let r = five();
        let d = summarize(&r, false);
        let json = render_decision(OutputFormat::Json, "run-1", r.subject_id(), &d)
            .unwrap()
            .unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["schema_version"], SCHEMA_VERSION);
        assert_eq!(v["run_id"], "run-1");
        assert_eq!(v["subject_id"], "P");
        assert_eq!(v["decision"]["shown"][0]["id"], "C");
        assert_eq!(v["decision"]["confidence_series"][1]["kind"], "aggregate");
    }

    #[test]
    fn markdown_marks_aggregates_and_toggle() {
        let r = five();
        let md = render_markdown(r.subject_id(), &summarize(&r, false));
        assert!(md.starts_with("# Substitutes for P"));
        assert!(md.contains("| 1 | C | 45.0 |"));
        assert!(md.contains("| | _Average Others_ | 36."));
        assert!(md.contains("| | _Others_ | 85.0 |"));
        assert!(md.contains("4 more hidden"));
    }

    #[test]
    fn markdown_escapes_pipes_in_ids() {
        let entry = SubstituteEntry::new(ProductId::new("A|B").unwrap(), 90.0, 50.0).unwrap();
        let r = PredictionResult::new(ProductId::new("P").unwrap(), vec![entry]).unwrap();
        let md = render_markdown(r.subject_id(), &summarize(&r, false));
        assert!(md.contains("| 1 | A\\|B | 90.0 |"));
        assert!(!md.contains("| A|B |"));
    }

    #[test]
    fn markdown_empty_result() {
        let r = PredictionResult::empty(ProductId::new("Z").unwrap());
        let md = render_markdown(r.subject_id(), &summarize(&r, false));
        assert!(md.contains("No substitutes found."));
    }

    #[test]
    fn exitcode_renders_nothing() {
        let r = five();
        let d = summarize(&r, true);
        assert!(render_decision(OutputFormat::Exitcode, "run-1", r.subject_id(), &d)
            .unwrap()
            .is_none());
    }

    #[test]
    fn upstream_failure_always_printed() {
        let err = Error::UpstreamFailure("Product not found".into());
        assert_eq!(
            render_error(OutputFormat::Exitcode, "run-1", &err, false).as_deref(),
            Some("Product not found")
        );
        assert!(render_error(OutputFormat::Exitcode, "run-1", &Error::EmptyId, false).is_none());
    }

    #[test]
    fn json_error_is_structured() {
        let err = Error::UpstreamFailure("Product not found".into());
        let json = render_error(OutputFormat::Json, "run-9", &err, false).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["error"]["code"], 30);
        assert_eq!(v["error"]["message"], "Product not found");
    }
}
