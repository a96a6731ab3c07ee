use thiserror::Error;

/// The two ways a remote call can fail. Callers treat both the same way
/// (fall back to the snapshot), but logs and tests can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport error, connection failure, timeout or non-2xx status.
    RemoteUnavailable,
    /// The payload could not be decoded into the expected shape.
    MalformedResponse,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response from {url}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RemoteError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RemoteError::MalformedResponse { .. } => FailureKind::MalformedResponse,
            RemoteError::ClientBuild(_)
            | RemoteError::NetworkRequest(..)
            | RemoteError::HttpStatus { .. } => FailureKind::RemoteUnavailable,
        }
    }
}
