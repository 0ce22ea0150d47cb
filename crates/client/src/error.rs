//! Client error types.

use std::sync::Arc;
use std::time::Duration;

use freshcache_core::storage::RepositoryError;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Translates this error into the repository error taxonomy.
    ///
    /// `timeout` is reported for requests that exceeded the client deadline.
    ///
    /// - connect / request failures → `NetworkUnavailable`
    /// - timeouts → `Timeout`
    /// - 404 → `NotFound`
    /// - other non-2xx → `RemoteRejected`
    /// - undecodable bodies → `Unknown`
    pub fn into_repository_error(self, timeout: Duration) -> RepositoryError {
        match self {
            ClientError::Request(err) if err.is_timeout() => RepositoryError::Timeout(timeout),
            ClientError::Request(err) if err.is_decode() || err.is_body() => {
                RepositoryError::Unknown {
                    message: "Failed to decode remote response".to_string(),
                    cause: Some(Arc::new(err)),
                }
            }
            ClientError::Request(err) => RepositoryError::NetworkUnavailable {
                message: err.to_string(),
                cause: Some(Arc::new(err)),
            },
            ClientError::ServerError { status, message } => {
                RepositoryError::RemoteRejected { status, message }
            }
            ClientError::NotFound { resource } => RepositoryError::NotFound { key: resource },
            ClientError::Json(err) => {
                RepositoryError::unknown_from("Failed to decode remote response", err)
            }
        }
    }
}
