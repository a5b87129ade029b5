//! Per-result view state.
//!
//! The only mutable state a results screen carries is the current result and
//! its "show all" flag. Installing a new result always starts collapsed.

use subst_common::PredictionResult;
use subst_config::SummaryPolicy;

use crate::decision::{DisplayDecision, ResultSummarizer};

#[derive(Debug, Clone)]
pub struct ResultView {
    result: PredictionResult,
    show_all: bool,
    summarizer: ResultSummarizer,
}

impl ResultView {
    /// View over `result` with the built-in policy, collapsed.
    pub fn new(result: PredictionResult) -> Self {
        Self::with_policy(result, SummaryPolicy::default())
    }

    pub fn with_policy(result: PredictionResult, policy: SummaryPolicy) -> Self {
        ResultView {
            result,
            show_all: false,
            summarizer: ResultSummarizer::new(policy),
        }
    }

    pub fn result(&self) -> &PredictionResult {
        &self.result
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// Flip "show all" and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.show_all = !self.show_all;
        self.show_all
    }

    /// Install a newer result; the flag resets to collapsed.
    pub fn replace(&mut self, result: PredictionResult) {
        self.result = result;
        self.show_all = false;
    }

    pub fn decision(&self) -> DisplayDecision {
        self.summarizer.summarize(&self.result, self.show_all)
    }
}
