//! Finalization stage of a JSON Schema generator.
//!
//! An upstream type walk produces one schema fragment per type plus empty
//! placeholder nodes wherever a fragment refers to another type. This crate
//! turns those into a single document:
//!
//! 1. **Definition resolution** ([`passes::p0_definitions`]) decides per type
//!    whether its fragment is inlined into each placeholder or shared through
//!    the definitions container (`$defs` / `definitions`) and `$ref`.
//! 2. **`allOf` cleanup** ([`passes::p1_allof_cleanup`]) merges composition
//!    wrappers into their parent wherever that keeps validation unchanged.
//!
//! ```
//! use schemagen_core::{SchemaGenerator, TypeGraph};
//! use serde_json::json;
//!
//! let graph: TypeGraph = serde_json::from_value(json!({
//!     "mainType": "Person",
//!     "types": [
//!         { "id": "Person", "schema": { "type": "object", "properties": {
//!             "home": { "$placeholder": "Address" },
//!             "work": { "$placeholder": "Address" } } } },
//!         { "id": "Address", "schema": { "type": "object" } }
//!     ]
//! })).unwrap();
//!
//! let schema = SchemaGenerator::default().generate_from_graph(&graph).unwrap();
//! assert_eq!(schema["properties"]["home"], json!({ "$ref": "#/$defs/Address" }));
//! assert_eq!(schema["$defs"]["Address"], json!({ "type": "object" }));
//! ```

pub mod arena;
pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod graph;
pub mod nullable;
pub mod passes;
pub mod schema_utils;

pub use arena::{NodeId, SchemaArena, SchemaNode};
pub use config::{GeneratorConfig, SchemaKeyword, SchemaVersion};
pub use context::{GenerationContext, TypeKey};
pub use error::GenerateError;
pub use generator::SchemaGenerator;
pub use graph::{TypeEntry, TypeGraph};
pub use nullable::{NullableTransform, TypeUnionNullable};
pub use passes::p1_allof_cleanup::discard_unnecessary_all_of_wrappers;
pub use schema_utils::build_path;

/// Generate the schema described by `graph` with the given options.
pub fn generate(graph: &TypeGraph, config: &GeneratorConfig) -> Result<serde_json::Value, GenerateError> {
    SchemaGenerator::new(config.clone()).generate_from_graph(graph)
}
