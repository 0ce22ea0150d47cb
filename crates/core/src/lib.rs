//! Core types and traits for freshcache.
//!
//! This crate holds everything that does not depend on a particular store or
//! transport: the [`Record`](record::Record) abstraction, the
//! [`LocalStore`](storage::LocalStore) and [`RemoteSource`](storage::RemoteSource)
//! traits, the error taxonomy, the freshness policy and the domain models.

pub mod cache;
pub mod clock;
pub mod models;
pub mod record;
pub mod sorting;
pub mod storage;
