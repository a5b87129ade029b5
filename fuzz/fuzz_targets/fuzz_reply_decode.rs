//! Fuzz target for prediction reply decoding.
//!
//! Arbitrary bytes must either decode into a reply or fail cleanly, and a
//! decoded reply must convert into a result (or an error) without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use subst_common::{PredictionReply, ProductId};

fuzz_target!(|data: &[u8]| {
    if let Ok(reply) = serde_json::from_slice::<PredictionReply>(data) {
        let queried = ProductId::new("fuzz").ok();
        let _ = reply.into_result(queried.as_ref());
    }
});
