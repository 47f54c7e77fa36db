//! Result store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from persisting recommendation records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be opened or written.
    #[error("failed to append to store at {path}: {source}")]
    AppendFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized to JSON.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
