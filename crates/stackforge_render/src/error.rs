//! Error types for the render module.

use thiserror::Error;

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unsupported render target: {0}")]
    UnsupportedTarget(String),

    #[error("Schema rejected: {0}")]
    InvalidSchema(String),

    #[error("Refusing to write outside the output root: {0}")]
    UnsafePath(String),

    #[error("Schema error: {0}")]
    Schema(#[from] stackforge_schema::SchemaError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
