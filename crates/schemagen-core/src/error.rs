//! Error types for schema generation.

use thiserror::Error;

/// Contract violations detected while loading a type graph or assembling the
/// final document.
///
/// The definition resolver and the `allOf` cleanup never fail on well-formed
/// input; every variant here describes input the upstream collaborator should
/// not have produced.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown type '{0}'")]
    UnknownType(String),

    #[error("Type '{0}' is defined more than once")]
    DuplicateType(String),

    #[error("Invalid type graph at {path}: {message}")]
    InvalidTypeGraph { path: String, message: String },

    #[error("Definition '{key}' is claimed by more than one alias group")]
    DefinitionConflict { key: String },

    #[error("Document node at {path} contains itself")]
    CyclicDocument { path: String },
}
