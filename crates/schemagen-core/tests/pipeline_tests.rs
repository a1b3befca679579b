//! Integration tests for the resolution + cleanup pipeline, driven through the
//! public `GenerationContext` API the way an upstream type walk would use it.

use schemagen_core::passes::p0_definitions::build_definitions_and_resolve_references;
use schemagen_core::{
    discard_unnecessary_all_of_wrappers, GenerationContext, GeneratorConfig, NodeId,
    SchemaGenerator, SchemaNode, TypeKey, TypeUnionNullable,
};
use serde_json::{json, Value};

fn define(ctx: &mut GenerationContext, id: &str, schema: Value) -> TypeKey {
    let SchemaNode::Object(fragment) = ctx.arena_mut().import(&schema) else {
        panic!("fragment must be an object");
    };
    ctx.define_type(id, id, fragment).unwrap()
}

fn value_of(ctx: &GenerationContext, node: NodeId) -> Value {
    ctx.arena().to_value(&SchemaNode::Object(node)).unwrap()
}

/// Main type with a handful of dependents and placeholders of every kind.
fn populated_context() -> (GenerationContext, TypeKey, Vec<NodeId>) {
    let mut ctx = GenerationContext::new();
    let main = define(&mut ctx, "Main", json!({ "type": "object" }));
    let once = define(&mut ctx, "Once", json!({ "type": "boolean" }));
    let twice = define(&mut ctx, "Twice", json!({ "type": "string" }));
    let maybe = define(&mut ctx, "Maybe", json!({ "type": "number" }));

    let placeholders = vec![
        ctx.create_placeholder(main, false),
        ctx.create_placeholder(main, true),
        ctx.create_placeholder(once, false),
        ctx.create_placeholder(twice, false),
        ctx.create_placeholder(twice, false),
        ctx.create_placeholder(maybe, true),
        ctx.create_placeholder(maybe, true),
        ctx.create_placeholder(maybe, false),
    ];
    (ctx, main, placeholders)
}

// ── Reference completeness ──────────────────────────────────────────────────

#[test]
fn test_every_placeholder_is_filled() {
    for create_definitions_for_all_objects in [false, true] {
        let config = GeneratorConfig {
            create_definitions_for_all_objects,
            ..GeneratorConfig::default()
        };
        let (mut ctx, main, placeholders) = populated_context();
        build_definitions_and_resolve_references(&mut ctx, main, &config, &TypeUnionNullable)
            .unwrap();

        for p in placeholders {
            assert!(
                !ctx.arena().is_empty_object(p),
                "placeholder left empty: {:?}",
                value_of(&ctx, p)
            );
        }
    }
}

// ── Definitions exclusivity ─────────────────────────────────────────────────

#[test]
fn test_main_type_never_defined() {
    for create_definitions_for_all_objects in [false, true] {
        let config = GeneratorConfig {
            create_definitions_for_all_objects,
            ..GeneratorConfig::default()
        };
        let (mut ctx, main, _) = populated_context();
        for _ in 0..5 {
            ctx.create_placeholder(main, false);
        }
        let defs =
            build_definitions_and_resolve_references(&mut ctx, main, &config, &TypeUnionNullable)
                .unwrap();

        assert!(!ctx.arena().get(defs).contains_key("Main"));
    }
}

// ── Single-use inlining / multi-use sharing ─────────────────────────────────

#[test]
fn test_single_use_inlined_into_placeholder() {
    let mut ctx = GenerationContext::new();
    let main = define(&mut ctx, "Main", json!({}));
    let fragment = json!({ "type": "object", "properties": { "a": { "type": "integer" } } });
    let once = define(&mut ctx, "Once", fragment.clone());
    let p = ctx.create_placeholder(once, false);

    let defs = build_definitions_and_resolve_references(
        &mut ctx,
        main,
        &GeneratorConfig::default(),
        &TypeUnionNullable,
    )
    .unwrap();

    assert!(ctx.arena().is_empty_object(defs));
    assert_eq!(value_of(&ctx, p), fragment);
}

#[test]
fn test_three_uses_share_one_definition() {
    let mut ctx = GenerationContext::new();
    let main = define(&mut ctx, "Main", json!({}));
    let shared = define(&mut ctx, "Shared", json!({ "type": "integer" }));
    let placeholders: Vec<NodeId> = (0..3).map(|_| ctx.create_placeholder(shared, false)).collect();

    let defs = build_definitions_and_resolve_references(
        &mut ctx,
        main,
        &GeneratorConfig::default(),
        &TypeUnionNullable,
    )
    .unwrap();

    assert_eq!(value_of(&ctx, defs), json!({ "Shared": { "type": "integer" } }));
    let tokens: Vec<Value> = placeholders.iter().map(|p| value_of(&ctx, *p)).collect();
    assert!(tokens.iter().all(|t| *t == json!({ "$ref": "#/$defs/Shared" })));
}

// ── Nullable threshold ──────────────────────────────────────────────────────

#[test]
fn test_nullable_threshold() {
    let (mut ctx, main, placeholders) = populated_context();
    let defs = build_definitions_and_resolve_references(
        &mut ctx,
        main,
        &GeneratorConfig::default(),
        &TypeUnionNullable,
    )
    .unwrap();

    // Maybe: one plain + two nullable → plain definition and nullable definition
    assert_eq!(
        value_of(&ctx, defs),
        json!({
            "Maybe": { "type": "number" },
            "Maybe-nullable": { "anyOf": [{ "type": "null" }, { "$ref": "#/$defs/Maybe" }] },
            "Twice": { "type": "string" }
        })
    );
    assert_eq!(value_of(&ctx, placeholders[0]), json!({ "$ref": "#" }));
    assert_eq!(
        value_of(&ctx, placeholders[1]),
        json!({ "anyOf": [{ "type": "null" }, { "$ref": "#" }] })
    );
    assert_eq!(value_of(&ctx, placeholders[2]), json!({ "type": "boolean" }));
    assert_eq!(
        value_of(&ctx, placeholders[5]),
        json!({ "$ref": "#/$defs/Maybe-nullable" })
    );
    assert_eq!(value_of(&ctx, placeholders[7]), json!({ "$ref": "#/$defs/Maybe" }));
}

// ── Cleanup properties ──────────────────────────────────────────────────────

#[test]
fn test_spec_examples() {
    let config = GeneratorConfig::default();

    let mut safe = json!({ "allOf": [{ "type": "string" }, { "minLength": 1 }] });
    discard_unnecessary_all_of_wrappers(&mut safe, &config);
    assert_eq!(safe, json!({ "type": "string", "minLength": 1 }));

    let mut unsafe_merge = json!({ "maxLength": 5, "allOf": [{ "maxLength": 10 }] });
    discard_unnecessary_all_of_wrappers(&mut unsafe_merge, &config);
    assert_eq!(unsafe_merge, json!({ "maxLength": 5, "allOf": [{ "maxLength": 10 }] }));

    let mut with_false = json!({ "allOf": [{ "type": "number" }, false] });
    discard_unnecessary_all_of_wrappers(&mut with_false, &config);
    assert_eq!(with_false, json!({ "allOf": [{ "type": "number" }, false] }));
}

// ── Full generation ─────────────────────────────────────────────────────────

#[test]
fn test_generate_full_document() {
    let (mut ctx, main, placeholders) = populated_context();
    let main_fragment = ctx.definition(main);
    let props = ctx.arena_mut().create_object();
    for (i, p) in placeholders.iter().enumerate() {
        ctx.arena_mut()
            .put(props, &format!("p{i}"), SchemaNode::Object(*p));
    }
    ctx.arena_mut()
        .put(main_fragment, "properties", SchemaNode::Object(props));

    let schema = SchemaGenerator::default().generate(ctx, main).unwrap();

    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["p0"], json!({ "$ref": "#" }));
    assert_eq!(schema["properties"]["p3"], json!({ "$ref": "#/$defs/Twice" }));
    assert!(schema["$defs"].get("Main").is_none());
}

#[test]
fn test_generator_shared_across_threads() {
    let generator = SchemaGenerator::default();
    let results: Vec<Value> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let (ctx, main, _) = populated_context();
                    generator.generate(ctx, main).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in &results[1..] {
        assert_eq!(result, &results[0]);
    }
}
