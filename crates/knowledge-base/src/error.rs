//! Error types for loading the fact table.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a fact table.
///
/// These are the only fatal errors in the system: a process must not start
/// with a malformed table.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The table file could not be read.
    #[error("failed to read fact table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table is not valid JSON or does not match the schema.
    #[error("fact table parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The same emergency type is declared twice.
    #[error("duplicate emergency type: {0}")]
    DuplicateType(String),

    /// A row references a type that is not declared.
    #[error("unknown emergency type referenced by {context}: {name}")]
    UnknownType { context: &'static str, name: String },

    /// A value is out of range or otherwise unusable.
    #[error("invalid fact table entry: {0}")]
    Invalid(String),
}
