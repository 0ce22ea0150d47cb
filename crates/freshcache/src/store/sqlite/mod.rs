//! SQLite store backend.
//!
//! Persists records as JSON bodies in a single `records` table keyed by
//! `(collection, key)`, using `rusqlite` for synchronous operations and
//! `tokio-rusqlite` for async wrapping. Several record kinds can share one
//! database file.

mod error;
mod schema;
mod store;

pub use store::SqliteStore;
