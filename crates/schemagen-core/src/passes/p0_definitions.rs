//! Pass 0: Definition Resolution
//!
//! Decides, for every group of types sharing an alias, whether the group's
//! fragment is inlined into each placeholder or registered once in the
//! definitions container and referenced by `$ref`. Every placeholder is
//! rewritten in place.
//!
//! Types are grouped by the sanitized form of their display name. All members
//! of a group are assumed to be interchangeable: the group shares the fragment
//! of its first member (in definition order) and the union of the members'
//! placeholders.

use std::collections::BTreeMap;

use crate::arena::{NodeId, SchemaArena, SchemaNode};
use crate::config::{GeneratorConfig, SchemaKeyword};
use crate::context::{GenerationContext, TypeKey};
use crate::error::GenerateError;
use crate::nullable::NullableTransform;

/// Suffix of the alias under which a shared nullable variant is registered.
pub const NULLABLE_ALIAS_SUFFIX: &str = "-nullable";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Resolve every placeholder in `context` and build the definitions container.
///
/// Returns the container node (possibly empty). `main_type` is never added
/// to it; placeholders for the main type receive the self-reference token.
///
/// Fails with [`GenerateError::DefinitionConflict`] when two groups need the
/// same definitions key, e.g. a group aliased `Foo-nullable` next to the
/// shared nullable variant of group `Foo`.
pub fn build_definitions_and_resolve_references(
    context: &mut GenerationContext,
    main_type: TypeKey,
    config: &GeneratorConfig,
    nullable: &dyn NullableTransform,
) -> Result<NodeId, GenerateError> {
    let groups = group_by_alias(context);
    let definitions = context.arena_mut().create_object();
    for (alias, types) in &groups {
        resolve_group(context, definitions, alias, types, main_type, config, nullable)?;
    }
    Ok(definitions)
}

/// Turn a display name into a token usable as a JSON Pointer segment.
///
/// Whitespace is removed, `[]` becomes `*` and generic angle brackets become
/// parentheses.
///
/// # Example
/// ```
/// use schemagen_core::passes::p0_definitions::sanitize_alias;
/// assert_eq!(sanitize_alias("Map<String, Integer[]>"), "Map(String,Integer*)");
/// ```
pub fn sanitize_alias(display_name: &str) -> String {
    display_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replace("[]", "*")
        .replace('<', "(")
        .replace('>', ")")
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Alias → member types, sorted by alias; members keep definition order.
fn group_by_alias(context: &GenerationContext) -> BTreeMap<String, Vec<TypeKey>> {
    let mut groups: BTreeMap<String, Vec<TypeKey>> = BTreeMap::new();
    for ty in context.defined_types() {
        groups
            .entry(sanitize_alias(context.display_name(ty)))
            .or_default()
            .push(ty);
    }
    for (alias, types) in &groups {
        warn_on_divergent_members(context, alias, types);
    }
    groups
}

fn warn_on_divergent_members(context: &GenerationContext, alias: &str, types: &[TypeKey]) {
    let Some(&canonical) = types.first() else {
        return;
    };
    for other in divergent_members(context, types) {
        tracing::warn!(
            alias,
            canonical = context.type_id(canonical),
            other = context.type_id(other),
            "types share an alias but have different fragments; using the first"
        );
    }
}

/// Members of an alias group whose fragment differs from the first member's.
fn divergent_members(context: &GenerationContext, types: &[TypeKey]) -> Vec<TypeKey> {
    let Some((canonical, rest)) = types.split_first() else {
        return Vec::new();
    };
    let arena = context.arena();
    let canonical_schema = arena.to_value(&SchemaNode::Object(context.definition(*canonical)));
    rest.iter()
        .copied()
        .filter(|other| {
            let other_schema = arena.to_value(&SchemaNode::Object(context.definition(*other)));
            !matches!((&canonical_schema, &other_schema), (Ok(a), Ok(b)) if a == b)
        })
        .collect()
}

/// Register `schema` under `key`, refusing to replace an existing entry.
fn insert_definition(
    arena: &mut SchemaArena,
    definitions: NodeId,
    key: &str,
    schema: NodeId,
) -> Result<(), GenerateError> {
    if arena.get(definitions).contains_key(key) {
        return Err(GenerateError::DefinitionConflict {
            key: key.to_string(),
        });
    }
    arena.put(definitions, key, SchemaNode::Object(schema));
    Ok(())
}

// ---------------------------------------------------------------------------
// Per-group resolution
// ---------------------------------------------------------------------------

fn resolve_group(
    context: &mut GenerationContext,
    definitions: NodeId,
    alias: &str,
    types: &[TypeKey],
    main_type: TypeKey,
    config: &GeneratorConfig,
    nullable: &dyn NullableTransform,
) -> Result<(), GenerateError> {
    let Some(&canonical) = types.first() else {
        return Ok(());
    };
    let fragment = context.definition(canonical);
    let references: Vec<NodeId> = types
        .iter()
        .flat_map(|ty| context.references(*ty).iter().copied())
        .collect();
    let nullable_references: Vec<NodeId> = types
        .iter()
        .flat_map(|ty| context.nullable_references(*ty).iter().copied())
        .collect();

    let contains_main = types.contains(&main_type);
    let create_definitions_for_all = config.create_definitions_for_all_objects;
    let ref_keyword = config.keyword(SchemaKeyword::Ref);
    let ref_prefix = config.keyword(SchemaKeyword::RefPrefix);

    let inline = !contains_main
        && (references.is_empty()
            || (!create_definitions_for_all
                && references.len() + nullable_references.len() < 2));

    tracing::debug!(
        alias,
        references = references.len(),
        nullable_references = nullable_references.len(),
        inline,
        "resolving alias group"
    );

    let arena = context.arena_mut();

    let reference_key = if inline {
        for &node in &references {
            arena.set_all(node, fragment);
        }
        None
    } else {
        let key = if contains_main {
            config.keyword(SchemaKeyword::RefMain).to_string()
        } else {
            insert_definition(arena, definitions, alias, fragment)?;
            format!("{ref_prefix}{alias}")
        };
        for &node in &references {
            arena.put(node, ref_keyword, key.as_str());
        }
        Some(key)
    };

    if nullable_references.is_empty() {
        return Ok(());
    }

    let definition = match &reference_key {
        None => arena.copy_object(fragment),
        Some(key) => {
            let node = arena.create_object();
            arena.put(node, ref_keyword, key.as_str());
            node
        }
    };
    nullable.make_nullable(arena, definition, config);

    if create_definitions_for_all || nullable_references.len() > 1 {
        let nullable_alias = format!("{alias}{NULLABLE_ALIAS_SUFFIX}");
        let nullable_key = format!("{ref_prefix}{nullable_alias}");
        insert_definition(arena, definitions, &nullable_alias, definition)?;
        for &node in &nullable_references {
            arena.put(node, ref_keyword, nullable_key.as_str());
        }
    } else {
        for &node in &nullable_references {
            arena.set_all(node, definition);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
