//! Trail store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from trail store operations.
///
/// Corrupt lines in a trail file are not errors: they are skipped with a
/// warning so that the rest of the history stays readable.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a trail file failed.
    #[error("Trail store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The trail cannot be persisted as given.
    #[error("Invalid trail: {0}")]
    InvalidTrail(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
