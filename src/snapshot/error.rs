use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot file '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("Failed to create snapshot directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read snapshot file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write snapshot file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode snapshot data from '{0}'")]
    CacheDecode(PathBuf, #[source] serde_json::Error),

    #[error("Failed to encode snapshot data")]
    CacheEncode(#[source] serde_json::Error),

    // Covers errors joining tokio blocking tasks
    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl SnapshotError {
    /// `true` when the snapshot simply has not been written yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SnapshotError::NotFound(_))
    }
}
