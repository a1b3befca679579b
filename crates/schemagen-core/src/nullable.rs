//! Transforms that make a schema node also accept `null`.

use crate::arena::{NodeId, SchemaArena, SchemaNode};
use crate::config::{GeneratorConfig, SchemaKeyword};

/// Rewrites a schema node in place so that it additionally accepts `null`.
///
/// Implementations must keep the node's identity: the resolver may already
/// have handed `node` out as a definitions entry.
pub trait NullableTransform: Send + Sync {
    fn make_nullable(&self, arena: &mut SchemaArena, node: NodeId, config: &GeneratorConfig);
}

/// Default transform.
///
/// Composite nodes (`$ref`, `allOf`, `anyOf`, `oneOf`) are wrapped as
/// `anyOf: [{"type": "null"}, <original>]`; simple nodes get `"null"` added
/// to their `type`. A node without `type` already accepts `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeUnionNullable;

impl NullableTransform for TypeUnionNullable {
    fn make_nullable(&self, arena: &mut SchemaArena, node: NodeId, config: &GeneratorConfig) {
        let null_type = config.keyword(SchemaKeyword::TypeNull);
        let type_keyword = config.keyword(SchemaKeyword::Type);

        let is_composite = [
            SchemaKeyword::Ref,
            SchemaKeyword::AllOf,
            SchemaKeyword::AnyOf,
            SchemaKeyword::OneOf,
        ]
        .into_iter()
        .any(|kw| arena.get(node).contains_key(config.keyword(kw)));

        if is_composite {
            let original = arena.copy_object(node);
            let null_schema = arena.create_object();
            arena.put(null_schema, type_keyword, null_type);
            arena.clear(node);
            arena.put(
                node,
                config.keyword(SchemaKeyword::AnyOf),
                SchemaNode::Array(vec![
                    SchemaNode::Object(null_schema),
                    SchemaNode::Object(original),
                ]),
            );
            return;
        }

        match arena.get_mut(node).get_mut(type_keyword) {
            Some(SchemaNode::Array(types)) => {
                if !types.iter().any(|t| t.as_str() == Some(null_type)) {
                    types.push(null_type.into());
                }
            }
            Some(existing @ SchemaNode::Scalar(_)) if existing.as_str() != Some(null_type) => {
                let single = existing.clone();
                *existing = SchemaNode::Array(vec![single, null_type.into()]);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn nullable(input: Value) -> Value {
        let mut arena = SchemaArena::new();
        let SchemaNode::Object(id) = arena.import(&input) else {
            panic!("expected object");
        };
        TypeUnionNullable.make_nullable(&mut arena, id, &GeneratorConfig::default());
        arena.to_value(&SchemaNode::Object(id)).unwrap()
    }

    #[test]
    fn test_single_type_becomes_union() {
        assert_eq!(
            nullable(json!({ "type": "string", "minLength": 1 })),
            json!({ "type": ["string", "null"], "minLength": 1 })
        );
    }

    #[test]
    fn test_type_array_gains_null_once() {
        assert_eq!(
            nullable(json!({ "type": ["string", "integer"] })),
            json!({ "type": ["string", "integer", "null"] })
        );
        assert_eq!(
            nullable(json!({ "type": ["string", "null"] })),
            json!({ "type": ["string", "null"] })
        );
    }

    #[test]
    fn test_null_type_unchanged() {
        assert_eq!(nullable(json!({ "type": "null" })), json!({ "type": "null" }));
    }

    #[test]
    fn test_untyped_unchanged() {
        assert_eq!(nullable(json!({ "minimum": 0 })), json!({ "minimum": 0 }));
    }

    #[test]
    fn test_ref_wrapped_in_any_of() {
        assert_eq!(
            nullable(json!({ "$ref": "#/$defs/Foo" })),
            json!({ "anyOf": [{ "type": "null" }, { "$ref": "#/$defs/Foo" }] })
        );
    }

    #[test]
    fn test_composition_wrapped_in_any_of() {
        assert_eq!(
            nullable(json!({ "oneOf": [{ "type": "string" }, { "type": "integer" }] })),
            json!({
                "anyOf": [
                    { "type": "null" },
                    { "oneOf": [{ "type": "string" }, { "type": "integer" }] }
                ]
            })
        );
    }
}
