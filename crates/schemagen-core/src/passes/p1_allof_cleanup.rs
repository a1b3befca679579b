//! Pass 1: `allOf` Cleanup
//!
//! Removes `allOf` wrappers that exist only because of how references were
//! assembled, by merging the parts into the parent node. A merge only happens
//! when it is a pure union of distinct keywords, so validation is unchanged.
//! Any `allOf` a user added deliberately is merged too if it qualifies.
//!
//! The document is traversed breadth-first over a work list of JSON Pointers
//! instead of recursively, which keeps stack depth flat on deeply nested
//! schemas. Each `allOf` is still simplified bottom-up before its parent.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::config::{GeneratorConfig, SchemaKeyword};
use crate::schema_utils::build_path;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Collapse every mergeable `allOf` in `schema`, in place.
///
/// Visits the root, every entry of the root's definitions container, and
/// every sub-schema reachable from those through `additionalProperties`,
/// `items`, `allOf`/`anyOf`/`oneOf`, `properties` and `patternProperties`.
pub fn discard_unnecessary_all_of_wrappers(schema: &mut Value, config: &GeneratorConfig) {
    let keywords = Keywords::new(config);

    let mut next_nodes: Vec<String> = vec![String::new()];
    if let Some(Value::Object(definitions)) = schema.get(keywords.definitions) {
        for (key, value) in definitions {
            if value.is_object() {
                next_nodes.push(build_path("", &[keywords.definitions, key]));
            }
        }
    }

    let mut round = 0usize;
    while !next_nodes.is_empty() {
        let current_nodes = std::mem::take(&mut next_nodes);
        tracing::trace!(round, nodes = current_nodes.len(), "allOf cleanup round");
        for path in current_nodes {
            let Some(node) = schema.pointer_mut(&path) else {
                continue;
            };
            merge_all_of_parts_if_possible(node, &keywords);
            if let Value::Object(obj) = node {
                collect_sub_schemas(obj, &path, &keywords, &mut next_nodes);
            }
        }
        round += 1;
    }
}

// ---------------------------------------------------------------------------
// Keyword sets
// ---------------------------------------------------------------------------

/// Version-specific keyword names used by this pass.
struct Keywords {
    all_of: &'static str,
    reference: &'static str,
    definitions: &'static str,
    ref_siblings_ignored: bool,
    /// Keywords holding a single sub-schema.
    with_schema: [&'static str; 2],
    /// Keywords holding an array of sub-schemas.
    with_schema_array: [&'static str; 3],
    /// Keywords holding an object whose values are sub-schemas.
    with_schema_object: [&'static str; 2],
}

impl Keywords {
    fn new(config: &GeneratorConfig) -> Self {
        Self {
            all_of: config.keyword(SchemaKeyword::AllOf),
            reference: config.keyword(SchemaKeyword::Ref),
            definitions: config.keyword(SchemaKeyword::Definitions),
            ref_siblings_ignored: config.ref_siblings_ignored(),
            with_schema: [
                config.keyword(SchemaKeyword::AdditionalProperties),
                config.keyword(SchemaKeyword::Items),
            ],
            with_schema_array: [
                config.keyword(SchemaKeyword::AllOf),
                config.keyword(SchemaKeyword::AnyOf),
                config.keyword(SchemaKeyword::OneOf),
            ],
            with_schema_object: [
                config.keyword(SchemaKeyword::Properties),
                config.keyword(SchemaKeyword::PatternProperties),
            ],
        }
    }
}

/// Queue the pointer of every object-valued sub-schema of `obj`.
fn collect_sub_schemas(
    obj: &Map<String, Value>,
    path: &str,
    keywords: &Keywords,
    next_nodes: &mut Vec<String>,
) {
    for keyword in keywords.with_schema {
        if let Some(Value::Object(_)) = obj.get(keyword) {
            next_nodes.push(build_path(path, &[keyword]));
        }
    }
    for keyword in keywords.with_schema_array {
        if let Some(Value::Array(items)) = obj.get(keyword) {
            for (i, item) in items.iter().enumerate() {
                if item.is_object() {
                    next_nodes.push(build_path(path, &[keyword, &i.to_string()]));
                }
            }
        }
    }
    for keyword in keywords.with_schema_object {
        if let Some(Value::Object(entries)) = obj.get(keyword) {
            for (key, value) in entries {
                if value.is_object() {
                    next_nodes.push(build_path(path, &[keyword, key]));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge the `allOf` parts of `schema` into it when every keyword across the
/// node and its parts is distinct.
///
/// Leaves the node untouched when a part is a non-object other than `true`,
/// when `$ref` is involved under a version that ignores `$ref` siblings, or
/// when any keyword appears more than once.
fn merge_all_of_parts_if_possible(schema: &mut Value, keywords: &Keywords) {
    let Value::Object(obj) = schema else {
        return;
    };
    let Some(Value::Array(parts)) = obj.get_mut(keywords.all_of) else {
        return;
    };
    for part in parts.iter_mut() {
        merge_all_of_parts_if_possible(part, keywords);
    }

    let Some(Value::Array(parts)) = obj.get(keywords.all_of) else {
        return;
    };
    // `true` accepts everything and can be dropped; `false` or any other
    // non-object cannot be expressed without the wrapper.
    if parts
        .iter()
        .any(|part| !part.is_object() && *part != Value::Bool(true))
    {
        return;
    }
    let object_parts: Vec<&Map<String, Value>> =
        parts.iter().filter_map(Value::as_object).collect();

    if keywords.ref_siblings_ignored
        && (obj.contains_key(keywords.reference)
            || object_parts
                .iter()
                .any(|part| part.contains_key(keywords.reference)))
    {
        return;
    }

    let mut field_count: HashMap<&str, usize> = HashMap::new();
    let own_fields = obj
        .keys()
        .filter(|key| key.as_str() != keywords.all_of);
    let part_fields = object_parts.iter().flat_map(|part| part.keys());
    for field in own_fields.chain(part_fields) {
        *field_count.entry(field.as_str()).or_insert(0) += 1;
    }
    if field_count.values().any(|&count| count > 1) {
        return;
    }

    let Some(Value::Array(parts)) = obj.shift_remove(keywords.all_of) else {
        return;
    };
    tracing::trace!(parts = parts.len(), "merging allOf parts into parent");
    for part in parts {
        if let Value::Object(fields) = part {
            obj.extend(fields);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
