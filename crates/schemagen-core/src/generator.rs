//! Final document assembly.

use serde_json::Value;

use crate::arena::SchemaNode;
use crate::config::{GeneratorConfig, SchemaKeyword};
use crate::context::{GenerationContext, TypeKey};
use crate::error::GenerateError;
use crate::graph::TypeGraph;
use crate::nullable::{NullableTransform, TypeUnionNullable};
use crate::passes::p0_definitions::build_definitions_and_resolve_references;
use crate::passes::p1_allof_cleanup::discard_unnecessary_all_of_wrappers;

/// Turns a populated [`GenerationContext`] into a JSON Schema document.
///
/// The generator itself is immutable; every call works on its own context,
/// so one instance can serve concurrent generations.
pub struct SchemaGenerator {
    config: GeneratorConfig,
    nullable: Box<dyn NullableTransform>,
}

impl SchemaGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            nullable: Box::new(TypeUnionNullable),
        }
    }

    /// Replace the transform applied to nullable use sites.
    pub fn with_nullable_transform(mut self, transform: impl NullableTransform + 'static) -> Self {
        self.nullable = Box::new(transform);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Resolve all references in `context` and build the schema for `main_type`.
    pub fn generate(
        &self,
        mut context: GenerationContext,
        main_type: TypeKey,
    ) -> Result<Value, GenerateError> {
        let config = &self.config;
        tracing::debug!(
            main_type = context.type_id(main_type),
            types = context.defined_types().count(),
            version = ?config.schema_version,
            "generating schema"
        );

        let result = context.arena_mut().create_object();
        if config.include_schema_version_indicator {
            context.arena_mut().put(
                result,
                config.keyword(SchemaKeyword::Schema),
                config.keyword(SchemaKeyword::SchemaValue),
            );
        }

        let definitions = build_definitions_and_resolve_references(
            &mut context,
            main_type,
            config,
            self.nullable.as_ref(),
        )?;
        let arena = context.arena_mut();
        if !arena.is_empty_object(definitions) {
            arena.put(
                result,
                config.keyword(SchemaKeyword::Definitions),
                SchemaNode::Object(definitions),
            );
        }
        let main_fragment = context.definition(main_type);
        context.arena_mut().set_all(result, main_fragment);

        let mut schema = context.arena().to_value(&SchemaNode::Object(result))?;
        if config.cleanup_unnecessary_all_of {
            discard_unnecessary_all_of_wrappers(&mut schema, config);
        }
        Ok(schema)
    }

    /// Load `graph` and generate the schema for its main type.
    pub fn generate_from_graph(&self, graph: &TypeGraph) -> Result<Value, GenerateError> {
        let (context, main_type) = graph.to_context()?;
        self.generate(context, main_type)
    }
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl std::fmt::Debug for SchemaGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
