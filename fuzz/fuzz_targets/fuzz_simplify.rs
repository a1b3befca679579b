#![no_main]

use libfuzzer_sys::fuzz_target;
use schemagen_core::{discard_unnecessary_all_of_wrappers, GeneratorConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(mut schema) = serde_json::from_slice::<serde_json::Value>(data) {
        discard_unnecessary_all_of_wrappers(&mut schema, &GeneratorConfig::default());
    }
});
