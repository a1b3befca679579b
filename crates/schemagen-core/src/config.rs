//! Configuration for schema generation.

use serde::{Deserialize, Serialize};

/// JSON Schema draft the generated document targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// Draft 6: `definitions`, `$ref` siblings ignored.
    #[serde(rename = "draft-6")]
    Draft6,
    /// Draft 7: `definitions`, `$ref` siblings ignored.
    #[serde(rename = "draft-7")]
    Draft7,
    /// Draft 2019-09: `$defs`, `$ref` applies alongside its siblings.
    #[serde(rename = "draft-2019-09")]
    Draft2019_09,
    /// Draft 2020-12: `$defs`, `$ref` applies alongside its siblings.
    #[serde(rename = "draft-2020-12")]
    Draft2020_12,
}

impl SchemaVersion {
    fn uses_defs(self) -> bool {
        matches!(self, SchemaVersion::Draft2019_09 | SchemaVersion::Draft2020_12)
    }
}

/// Logical schema keywords whose concrete spelling depends on the
/// [`SchemaVersion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKeyword {
    /// Property declaring the meta-schema (`$schema`).
    Schema,
    /// Value of the `$schema` property for the version.
    SchemaValue,
    /// Container of named sub-schemas (`definitions` / `$defs`).
    Definitions,
    Ref,
    /// Prefix of a reference into the definitions container.
    RefPrefix,
    /// Reference token pointing at the document root.
    RefMain,
    Type,
    /// Name of the `null` type.
    TypeNull,
    AllOf,
    AnyOf,
    OneOf,
    AdditionalProperties,
    Items,
    Properties,
    PatternProperties,
}

impl SchemaKeyword {
    /// Concrete keyword name (or fixed value) for the given version.
    pub fn for_version(self, version: SchemaVersion) -> &'static str {
        match self {
            SchemaKeyword::Schema => "$schema",
            SchemaKeyword::SchemaValue => match version {
                SchemaVersion::Draft6 => "http://json-schema.org/draft-06/schema#",
                SchemaVersion::Draft7 => "http://json-schema.org/draft-07/schema#",
                SchemaVersion::Draft2019_09 => "https://json-schema.org/draft/2019-09/schema",
                SchemaVersion::Draft2020_12 => "https://json-schema.org/draft/2020-12/schema",
            },
            SchemaKeyword::Definitions if version.uses_defs() => "$defs",
            SchemaKeyword::Definitions => "definitions",
            SchemaKeyword::Ref => "$ref",
            SchemaKeyword::RefPrefix if version.uses_defs() => "#/$defs/",
            SchemaKeyword::RefPrefix => "#/definitions/",
            SchemaKeyword::RefMain => "#",
            SchemaKeyword::Type => "type",
            SchemaKeyword::TypeNull => "null",
            SchemaKeyword::AllOf => "allOf",
            SchemaKeyword::AnyOf => "anyOf",
            SchemaKeyword::OneOf => "oneOf",
            SchemaKeyword::AdditionalProperties => "additionalProperties",
            SchemaKeyword::Items => "items",
            SchemaKeyword::Properties => "properties",
            SchemaKeyword::PatternProperties => "patternProperties",
        }
    }
}

/// Options for schema generation.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `schema-version`,
/// `create-definitions-for-all-objects`). Missing fields fall back to
/// [`GeneratorConfig::default`], so a config file only needs the overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GeneratorConfig {
    /// Target draft. Default: 2020-12.
    pub schema_version: SchemaVersion,
    /// Emit the `$schema` declaration at the document root. Default: true.
    pub include_schema_version_indicator: bool,
    /// Register every referenced type in the definitions container, even when
    /// it is used only once. Default: false.
    pub create_definitions_for_all_objects: bool,
    /// Collapse `allOf` wrappers that can be merged into their parent without
    /// changing validation. Default: true.
    pub cleanup_unnecessary_all_of: bool,
}

impl GeneratorConfig {
    /// Keyword spelling for the configured schema version.
    pub fn keyword(&self, keyword: SchemaKeyword) -> &'static str {
        keyword.for_version(self.schema_version)
    }

    /// Whether keywords placed next to `$ref` are ignored by validators of
    /// the configured version (drafts 6 and 7).
    ///
    /// Draft 6 is included on purpose even though the rule is usually stated
    /// for Draft 7 alone: Draft 6 validators ignore `$ref` siblings too, so
    /// merging a part next to `$ref` would drop its constraints there as well.
    pub fn ref_siblings_ignored(&self) -> bool {
        matches!(
            self.schema_version,
            SchemaVersion::Draft6 | SchemaVersion::Draft7
        )
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema_version: SchemaVersion::Draft2020_12,
            include_schema_version_indicator: true,
            create_definitions_for_all_objects: false,
            cleanup_unnecessary_all_of: true,
        }
    }
}
