//! freshcache - local-first repositories over fallible remote sources.
//!
//! A [`CachedRepository`] serves reads from a local store, refreshes it from a
//! remote source under a freshness window with single-flight coalescing, and
//! propagates local writes to the remote on a best-effort basis.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod logger;
pub mod output;
pub mod repository;
pub mod store;
pub mod sync;

pub use cache::DerivedCache;
pub use catalog::PlantCatalog;
pub use config::Config;
pub use logger::Logger;
pub use repository::{
    CachedRepository, RefreshOutcome, RepositoryOptions, SyncMode, WriteOutcome,
};
pub use store::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
pub use sync::{KeyLocks, LatestRequest, SingleFlight};
