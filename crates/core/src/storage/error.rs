use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Shared, clonable underlying cause of a [`RepositoryError`].
pub type Cause = Arc<dyn StdError + Send + Sync>;

/// Discriminant of a [`RepositoryError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NetworkUnavailable,
    Timeout,
    RemoteRejected,
    NotFound,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NetworkUnavailable => "network_unavailable",
            ErrorKind::Timeout => "timeout",
            ErrorKind::RemoteRejected => "remote_rejected",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during repository operations.
///
/// Remote failures are translated into these variants at the remote source
/// boundary. Local store failures surface as [`RepositoryError::Unknown`].
/// The type is `Clone` so that a single in-flight refresh can hand the same
/// outcome to every caller waiting on it.
#[derive(Debug, Error, Clone)]
pub enum RepositoryError {
    #[error("Network unavailable: {message}")]
    NetworkUnavailable {
        message: String,
        #[source]
        cause: Option<Cause>,
    },
    #[error("Remote call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Remote rejected request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },
    #[error("Record not found: {key}")]
    NotFound { key: String },
    #[error("Unknown error: {message}")]
    Unknown {
        message: String,
        #[source]
        cause: Option<Cause>,
    },
}

impl RepositoryError {
    /// Returns the taxonomy tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::NetworkUnavailable { .. } => ErrorKind::NetworkUnavailable,
            RepositoryError::Timeout(_) => ErrorKind::Timeout,
            RepositoryError::RemoteRejected { .. } => ErrorKind::RemoteRejected,
            RepositoryError::NotFound { .. } => ErrorKind::NotFound,
            RepositoryError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        RepositoryError::NetworkUnavailable {
            message: message.into(),
            cause: None,
        }
    }

    pub fn not_found(key: impl ToString) -> Self {
        RepositoryError::NotFound {
            key: key.to_string(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        RepositoryError::Unknown {
            message: message.into(),
            cause: None,
        }
    }

    /// Wraps an arbitrary error as [`RepositoryError::Unknown`], keeping it as the cause.
    pub fn unknown_from<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        RepositoryError::Unknown {
            message: message.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    /// Returns true for failures that may succeed when retried later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NetworkUnavailable | ErrorKind::Timeout
        )
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
