//! Fuzz target for scoring.json configuration parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use subst_config::validate::validate_scoring;
use subst_config::ScoringParams;

fuzz_target!(|data: &[u8]| {
    if let Ok(scoring) = serde_json::from_slice::<ScoringParams>(data) {
        let _ = validate_scoring(&scoring);
    }
});
