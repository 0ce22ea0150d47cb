//! Local-first repository over a remote source.
//!
//! See [`CachedRepository`] for the read, refresh and write discipline.

mod cached;
mod ledger;
mod options;
mod tasks;

pub use cached::{CachedRepository, RefreshOutcome, WriteOutcome};
pub use ledger::FetchLedger;
pub use options::{
    RepositoryOptions, SyncMode, DEFAULT_FETCH_TIMEOUT, DEFAULT_FRESHNESS_WINDOW,
    DEFAULT_MAX_CONCURRENT_FETCHES,
};
