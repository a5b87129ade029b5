//! Fuzz target for the summarizer.
//!
//! Builds results from arbitrary scores and checks the partition invariants
//! hold for every input the entry constructor accepts.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use subst_common::{PredictionResult, ProductId, SubstituteEntry};
use subst_core::decision::summarize;

#[derive(Debug, Arbitrary)]
struct Input {
    scores: Vec<(f64, f64)>,
    show_all: bool,
}

fuzz_target!(|input: Input| {
    let entries: Vec<SubstituteEntry> = input
        .scores
        .iter()
        .enumerate()
        .filter_map(|(i, &(c, p))| SubstituteEntry::new(ProductId::from(i as u64), c, p).ok())
        .collect();
    let total = entries.len();
    let Ok(result) = PredictionResult::new(ProductId::from(u64::MAX), entries) else {
        return;
    };

    let decision = summarize(&result, input.show_all);
    assert_eq!(decision.shown().len() + decision.hidden().len(), total);
    assert_eq!(decision.toggle_visible(), !decision.hidden().is_empty());
    if input.show_all {
        assert!(decision.hidden().is_empty());
    }
});
