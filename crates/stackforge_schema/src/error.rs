//! Error types for the schema module.

use thiserror::Error;

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur during schema operations.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Schema validation failed: {0}")]
    Invalid(String),

    #[error("Cyclic dependency: {0}")]
    CyclicDependency(String),

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}
