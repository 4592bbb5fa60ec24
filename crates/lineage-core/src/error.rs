//! Error types for snapshot and configuration loading.
//!
//! The lineage algorithms themselves never fail; they default missing data
//! and return empty results. Only reading inputs from disk can go wrong.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for lineage operations.
pub type Result<T> = std::result::Result<T, LineageError>;

/// Errors that can occur while loading lineage inputs.
#[derive(Error, Debug)]
pub enum LineageError {
    /// Failed to read a file from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input was not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl LineageError {
    /// Wraps an I/O error with the path that caused it.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
