//! Arena of mutable schema object nodes.
//!
//! Placeholders are identified by node, not by value: two empty placeholder
//! objects look identical but must receive different content. Every JSON
//! object of the intermediate document therefore lives in a [`SchemaArena`]
//! slot and is addressed by a [`NodeId`]. Object values nested inside another
//! object are stored as [`SchemaNode::Object`] handles, so copying properties
//! from one node to another shares the nested objects rather than cloning
//! them, and a placeholder resolved later is visible through every copy.
//!
//! [`SchemaArena::to_value`] turns a node back into a plain
//! [`serde_json::Value`] once all rewriting is done.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::GenerateError;
use crate::schema_utils::build_path;

/// Handle to an object node inside a [`SchemaArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A value stored in an arena object.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Shared reference to another arena object.
    Object(NodeId),
    /// Array whose object elements are arena handles.
    Array(Vec<SchemaNode>),
    /// String, number, boolean or null.
    Scalar(Value),
}

impl SchemaNode {
    /// The arena handle, when this is an object.
    pub fn as_object(&self) -> Option<NodeId> {
        match self {
            SchemaNode::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// The string content, when this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SchemaNode::Scalar(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for SchemaNode {
    fn from(s: &str) -> Self {
        SchemaNode::Scalar(Value::String(s.to_string()))
    }
}

impl From<String> for SchemaNode {
    fn from(s: String) -> Self {
        SchemaNode::Scalar(Value::String(s))
    }
}

/// Properties of one arena object, in insertion order.
pub type ObjectEntries = IndexMap<String, SchemaNode>;

/// Per-generation store of schema object nodes.
#[derive(Debug, Default)]
pub struct SchemaArena {
    objects: Vec<ObjectEntries>,
}

impl SchemaArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new, empty object node.
    pub fn create_object(&mut self) -> NodeId {
        self.objects.push(IndexMap::new());
        NodeId(self.objects.len() - 1)
    }

    /// Number of allocated object nodes.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Deep-import a JSON value; every object becomes a fresh arena node.
    pub fn import(&mut self, value: &Value) -> SchemaNode {
        match value {
            Value::Object(map) => {
                let id = self.create_object();
                for (key, val) in map {
                    let node = self.import(val);
                    self.put(id, key, node);
                }
                SchemaNode::Object(id)
            }
            Value::Array(arr) => SchemaNode::Array(arr.iter().map(|v| self.import(v)).collect()),
            other => SchemaNode::Scalar(other.clone()),
        }
    }

    pub fn get(&self, id: NodeId) -> &ObjectEntries {
        &self.objects[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut ObjectEntries {
        &mut self.objects[id.0]
    }

    /// Whether the object node has no properties.
    pub fn is_empty_object(&self, id: NodeId) -> bool {
        self.objects[id.0].is_empty()
    }

    /// Insert or overwrite a single property.
    pub fn put(&mut self, id: NodeId, key: &str, value: impl Into<SchemaNode>) {
        self.objects[id.0].insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, id: NodeId, key: &str) -> Option<SchemaNode> {
        self.objects[id.0].shift_remove(key)
    }

    /// Drop every property of the node, keeping its identity.
    pub fn clear(&mut self, id: NodeId) {
        self.objects[id.0].clear();
    }

    /// Copy every property of `source` onto `target`, overwriting same-named
    /// properties. Nested objects are shared, not cloned.
    pub fn set_all(&mut self, target: NodeId, source: NodeId) {
        if target == source {
            return;
        }
        let entries = self.objects[source.0].clone();
        self.objects[target.0].extend(entries);
    }

    /// New node carrying a shallow copy of `source`'s properties.
    pub fn copy_object(&mut self, source: NodeId) -> NodeId {
        let id = self.create_object();
        self.set_all(id, source);
        id
    }

    /// Materialize a node into a standalone JSON value.
    ///
    /// Shared nodes are emitted once per occurrence. A node that is reachable
    /// from its own properties cannot be represented as a tree and yields
    /// [`GenerateError::CyclicDocument`].
    pub fn to_value(&self, node: &SchemaNode) -> Result<Value, GenerateError> {
        let mut on_path = HashSet::new();
        self.materialize(node, "", &mut on_path)
    }

    fn materialize(
        &self,
        node: &SchemaNode,
        path: &str,
        on_path: &mut HashSet<NodeId>,
    ) -> Result<Value, GenerateError> {
        match node {
            SchemaNode::Scalar(value) => Ok(value.clone()),
            SchemaNode::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let child_path = build_path(path, &[&i.to_string()]);
                    out.push(self.materialize(item, &child_path, on_path)?);
                }
                Ok(Value::Array(out))
            }
            SchemaNode::Object(id) => {
                if !on_path.insert(*id) {
                    return Err(GenerateError::CyclicDocument {
                        path: path.to_string(),
                    });
                }
                let mut map = Map::new();
                for (key, val) in self.get(*id) {
                    let child_path = build_path(path, &[key]);
                    map.insert(key.clone(), self.materialize(val, &child_path, on_path)?);
                }
                on_path.remove(id);
                Ok(Value::Object(map))
            }
        }
    }
}
