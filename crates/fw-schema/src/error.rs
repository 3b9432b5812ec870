//! Schema compilation, import, and validation error types.

use fw_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested schema name was not found in the registry.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// JSON value did not pass schema validation.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed {
        /// Individual error messages from the validator.
        errors: Vec<String>,
    },

    /// Schema generation or compilation error.
    #[error("Schema generation error: {0}")]
    Generation(String),

    /// An imported schema has no `properties` object at its root.
    #[error("Schema has no 'properties' object to import")]
    MissingProperties,

    /// An imported document is not shaped like a JSON Schema.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Text handed in at a boundary is not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}
