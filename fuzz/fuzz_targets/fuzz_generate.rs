#![no_main]

use libfuzzer_sys::fuzz_target;
use schemagen_core::{generate, GeneratorConfig, TypeGraph};

// Arbitrary bytes parsed as a type graph; generation may reject the graph but
// must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(graph) = serde_json::from_slice::<TypeGraph>(data) {
        let _ = generate(&graph, &GeneratorConfig::default());
    }
});
