//! Fuzz target for catalog loading.

#![no_main]

use libfuzzer_sys::fuzz_target;
use subst_core::predict::Catalog;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(catalog) = Catalog::from_json(text) {
        for record in catalog.records() {
            let _ = catalog.candidates(&record.code);
        }
    }
});
