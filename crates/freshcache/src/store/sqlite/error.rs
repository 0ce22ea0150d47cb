//! SQLite error mapping.
//!
//! Local store failures surface as `RepositoryError::Unknown`, keeping the
//! underlying `rusqlite::Error` as the cause when there is one.

use freshcache_core::storage::RepositoryError;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
pub fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Maps a tokio_rusqlite error to a RepositoryError.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    collection: &'static str,
) -> RepositoryError {
    match err {
        tokio_rusqlite::Error::Rusqlite(e) => {
            RepositoryError::unknown_from(format!("SQLite operation on {collection} failed"), e)
        }
        tokio_rusqlite::Error::Close((_, e)) => {
            RepositoryError::unknown_from("SQLite connection closed unexpectedly", e)
        }
        tokio_rusqlite::Error::ConnectionClosed => {
            RepositoryError::unknown("SQLite connection closed")
        }
        other => RepositoryError::unknown(format!(
            "SQLite operation on {collection} failed: {other}"
        )),
    }
}
