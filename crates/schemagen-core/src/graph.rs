//! Loading a [`GenerationContext`] from a JSON type graph.
//!
//! A type graph lists every type with its schema fragment. Wherever a
//! fragment should point at another type it contains a placeholder marker,
//! an object whose only property is `$placeholder` (or `$nullablePlaceholder`
//! when the use site must also accept `null`) naming the target type id:
//!
//! ```json
//! {
//!   "mainType": "com.example.Person",
//!   "types": [
//!     {
//!       "id": "com.example.Person",
//!       "displayName": "Person",
//!       "schema": {
//!         "type": "object",
//!         "properties": {
//!           "home": { "$placeholder": "com.example.Address" },
//!           "work": { "$nullablePlaceholder": "com.example.Address" }
//!         }
//!       }
//!     },
//!     { "id": "com.example.Address", "schema": { "type": "object" } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::arena::{NodeId, SchemaNode};
use crate::context::{GenerationContext, TypeKey};
use crate::error::GenerateError;
use crate::schema_utils::build_path;

/// Marker property for a plain placeholder.
pub const PLACEHOLDER_KEY: &str = "$placeholder";
/// Marker property for a placeholder that must also accept `null`.
pub const NULLABLE_PLACEHOLDER_KEY: &str = "$nullablePlaceholder";

/// Serializable description of the types discovered by a type walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeGraph {
    /// Id of the type the schema is generated for.
    pub main_type: String,
    pub types: Vec<TypeEntry>,
}

/// One type of a [`TypeGraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEntry {
    /// Unique, fully qualified id.
    pub id: String,
    /// Name used for the definitions alias. Defaults to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Schema fragment, possibly containing placeholder markers.
    pub schema: Value,
}

impl TypeGraph {
    /// Parse a type graph from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GenerateError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a generation context, returning it with the main type's key.
    pub fn to_context(&self) -> Result<(GenerationContext, TypeKey), GenerateError> {
        let mut context = GenerationContext::new();

        // Declare every type first so fragments can reference types defined later.
        let mut declared = Vec::with_capacity(self.types.len());
        for entry in &self.types {
            let fragment = context.arena_mut().create_object();
            let display_name = entry.display_name.as_deref().unwrap_or(&entry.id);
            context.define_type(entry.id.as_str(), display_name, fragment)?;
            declared.push(fragment);
        }

        for (i, (entry, fragment)) in self.types.iter().zip(declared).enumerate() {
            let path = build_path("", &["types", &i.to_string(), "schema"]);
            let Value::Object(schema) = &entry.schema else {
                return Err(GenerateError::InvalidTypeGraph {
                    path,
                    message: format!("schema of '{}' must be an object", entry.id),
                });
            };
            if placeholder_marker(schema, &path)?.is_some() {
                return Err(GenerateError::InvalidTypeGraph {
                    path,
                    message: format!("schema of '{}' cannot itself be a placeholder", entry.id),
                });
            }
            import_object(&mut context, fragment, schema, &path)?;
        }

        let main = context
            .lookup(&self.main_type)
            .ok_or_else(|| GenerateError::UnknownType(self.main_type.clone()))?;
        Ok((context, main))
    }
}

// ---------------------------------------------------------------------------
// Fragment import
// ---------------------------------------------------------------------------

fn import_object(
    context: &mut GenerationContext,
    target: NodeId,
    schema: &Map<String, Value>,
    path: &str,
) -> Result<(), GenerateError> {
    for (key, value) in schema {
        let child_path = build_path(path, &[key]);
        let node = import_value(context, value, &child_path)?;
        context.arena_mut().put(target, key, node);
    }
    Ok(())
}

fn import_value(
    context: &mut GenerationContext,
    value: &Value,
    path: &str,
) -> Result<SchemaNode, GenerateError> {
    match value {
        Value::Object(map) => {
            if let Some((target, nullable)) = placeholder_marker(map, path)? {
                let ty = context
                    .lookup(target)
                    .ok_or_else(|| GenerateError::UnknownType(target.to_string()))?;
                return Ok(SchemaNode::Object(context.create_placeholder(ty, nullable)));
            }
            let id = context.arena_mut().create_object();
            import_object(context, id, map, path)?;
            Ok(SchemaNode::Object(id))
        }
        Value::Array(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let child_path = build_path(path, &[&i.to_string()]);
                nodes.push(import_value(context, item, &child_path)?);
            }
            Ok(SchemaNode::Array(nodes))
        }
        other => Ok(SchemaNode::Scalar(other.clone())),
    }
}

/// Target type id and nullability, when `map` is a placeholder marker.
fn placeholder_marker<'a>(
    map: &'a Map<String, Value>,
    path: &str,
) -> Result<Option<(&'a str, bool)>, GenerateError> {
    if map.len() != 1 {
        return Ok(None);
    }
    for (key, nullable) in [(PLACEHOLDER_KEY, false), (NULLABLE_PLACEHOLDER_KEY, true)] {
        if let Some(target) = map.get(key) {
            return match target.as_str() {
                Some(id) => Ok(Some((id, nullable))),
                None => Err(GenerateError::InvalidTypeGraph {
                    path: build_path(path, &[key]),
                    message: "placeholder target must be a type id string".to_string(),
                }),
            };
        }
    }
    Ok(None)
}
