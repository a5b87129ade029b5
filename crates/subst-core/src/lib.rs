//! Substitute Scout core library.
//!
//! - Display decisions: which substitutes to show, the "Others" rollups and
//!   chart-ready series
//! - Per-result view state (the "show all" toggle)
//! - Prediction sources: saved replies and the local catalog engine
//! - Configuration loading, logging, output rendering and exit codes
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod decision;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod predict;
pub mod schema;
pub mod view;

pub use decision::{summarize, summarize_with, DisplayDecision, ResultSummarizer};
pub use view::ResultView;
