//! Fuzz target for policy.json configuration parsing.
//!
//! Tests that policy parsing and validation handle arbitrary input
//! without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use subst_config::validate::validate_policy;
use subst_config::SummaryPolicy;

fuzz_target!(|data: &[u8]| {
    // Should never panic, only return an error
    if let Ok(policy) = serde_json::from_slice::<SummaryPolicy>(data) {
        let _ = validate_policy(&policy);
    }
});
