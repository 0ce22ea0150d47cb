//! Local store backends.
//!
//! Both backends implement [`LocalStore`](freshcache_core::storage::LocalStore)
//! and share the same change-notification machinery.

pub mod inmemory;
mod observers;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
