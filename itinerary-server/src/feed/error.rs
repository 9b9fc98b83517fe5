//! Feed snapshot error types.

use std::path::PathBuf;

/// Errors that can occur when loading a feed snapshot.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Snapshot file could not be read
    #[error("failed to read feed snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot is not valid JSON or has the wrong shape
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record decoded but failed validation
    #[error("invalid {record}: {message}")]
    InvalidRecord { record: String, message: String },
}

impl FeedError {
    pub(crate) fn invalid(record: impl Into<String>, message: impl ToString) -> Self {
        FeedError::InvalidRecord {
            record: record.into(),
            message: message.to_string(),
        }
    }
}
