//! Display decisions for a prediction result.
//!
//! A decision splits the substitutes of one result into entries that are
//! drawn individually and entries folded into a single "Others" aggregate,
//! then lays both out as a confidence (bar) series and a probability (pie)
//! series.

pub mod series;
pub mod summarizer;

pub use series::{PointKind, SeriesPoint, AVERAGE_OTHERS_LABEL, OTHERS_LABEL};
pub use summarizer::{summarize, summarize_with, DisplayDecision, ResultSummarizer};
