//! Cross-cutting error types for Quill.
//!
//! Storage and configuration errors live in their own crates. Decode failures
//! are represented here but only surface through the strict
//! [`crate::blob::try_decode_all`]; every best-effort accessor absorbs them.

use thiserror::Error;

/// Errors that can be raised by the Quill core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The column, old-value, and new-value sequences of a change set differ in length.
    #[error(
        "Change set shape mismatch: {columns} column(s), {old} old value(s), {new} new value(s)"
    )]
    ArgumentShape {
        columns: usize,
        old: usize,
        new: usize,
    },

    /// A blob could not be parsed as a flat JSON object.
    #[error("Malformed blob: {0}")]
    MalformedBlob(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_shape_message_names_all_lengths() {
        let err = CoreError::ArgumentShape {
            columns: 2,
            old: 1,
            new: 2,
        };
        assert_eq!(
            err.to_string(),
            "Change set shape mismatch: 2 column(s), 1 old value(s), 2 new value(s)"
        );
    }
}
