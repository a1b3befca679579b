//! Per-generation registry of type fragments and their placeholders.
//!
//! The upstream type walk (or [`crate::graph::TypeGraph`]) records here, for
//! every type it encountered, the generated fragment and each placeholder node
//! that should end up pointing at that type. The definition resolver consumes
//! the context exactly once.

use std::collections::HashMap;

use crate::arena::{NodeId, SchemaArena};
use crate::error::GenerateError;

/// Handle to a type defined in a [`GenerationContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(usize);

#[derive(Debug)]
struct DefinedType {
    id: String,
    display_name: String,
    fragment: NodeId,
    references: Vec<NodeId>,
    nullable_references: Vec<NodeId>,
}

/// Fragments, placeholders and the arena they live in.
#[derive(Debug, Default)]
pub struct GenerationContext {
    arena: SchemaArena,
    types: Vec<DefinedType>,
    index: HashMap<String, TypeKey>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arena(&self) -> &SchemaArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut SchemaArena {
        &mut self.arena
    }

    /// Register a type under its unique qualified `id`.
    ///
    /// `display_name` is the human-readable name aliases are derived from;
    /// distinct types may share it.
    pub fn define_type(
        &mut self,
        id: impl Into<String>,
        display_name: impl Into<String>,
        fragment: NodeId,
    ) -> Result<TypeKey, GenerateError> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(GenerateError::DuplicateType(id));
        }
        let key = TypeKey(self.types.len());
        self.index.insert(id.clone(), key);
        self.types.push(DefinedType {
            id,
            display_name: display_name.into(),
            fragment,
            references: Vec::new(),
            nullable_references: Vec::new(),
        });
        Ok(key)
    }

    /// Allocate an empty node and register it as a placeholder for `ty`.
    pub fn create_placeholder(&mut self, ty: TypeKey, nullable: bool) -> NodeId {
        let node = self.arena.create_object();
        if nullable {
            self.add_nullable_reference(ty, node);
        } else {
            self.add_reference(ty, node);
        }
        node
    }

    pub fn add_reference(&mut self, ty: TypeKey, placeholder: NodeId) {
        self.types[ty.0].references.push(placeholder);
    }

    pub fn add_nullable_reference(&mut self, ty: TypeKey, placeholder: NodeId) {
        self.types[ty.0].nullable_references.push(placeholder);
    }

    pub fn lookup(&self, id: &str) -> Option<TypeKey> {
        self.index.get(id).copied()
    }

    /// All defined types, in definition order.
    pub fn defined_types(&self) -> impl Iterator<Item = TypeKey> + '_ {
        (0..self.types.len()).map(TypeKey)
    }

    pub fn type_id(&self, ty: TypeKey) -> &str {
        &self.types[ty.0].id
    }

    pub fn display_name(&self, ty: TypeKey) -> &str {
        &self.types[ty.0].display_name
    }

    /// The fragment generated for `ty`.
    pub fn definition(&self, ty: TypeKey) -> NodeId {
        self.types[ty.0].fragment
    }

    pub fn references(&self, ty: TypeKey) -> &[NodeId] {
        &self.types[ty.0].references
    }

    pub fn nullable_references(&self, ty: TypeKey) -> &[NodeId] {
        &self.types[ty.0].nullable_references
    }
}
