//! Cross-cutting error types for Formwork.
//!
//! Structural edits never fail (invalid drops are no-ops), so these errors
//! surface only at boundaries: loading a persisted tree, looking up a node a
//! caller insists must exist.

use thiserror::Error;

/// Errors that can be raised by any Formwork crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Node lookup returned no result.
    #[error("Field not found: {id}")]
    NotFound { id: String },

    /// Data failed validation (duplicate ids, missing keys, key collisions).
    #[error("Validation error: {0}")]
    Validation(String),
}
