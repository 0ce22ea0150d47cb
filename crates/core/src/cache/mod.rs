//! Cache entries and the freshness policy.

mod entry;
mod freshness;

pub use entry::CacheEntry;
pub use freshness::{decide, window_from_std, FetchDecision};
