//! In-memory store backend.
//!
//! Useful for tests and for callers that only need a process-lifetime cache.
//!
//! # Example
//!
//! ```rust,ignore
//! use freshcache::store::inmemory::InMemoryStore;
//! use freshcache_core::models::Plant;
//!
//! let store = InMemoryStore::<Plant>::new();
//! ```

mod store;

pub use store::InMemoryStore;
