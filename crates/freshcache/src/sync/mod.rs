//! Concurrency primitives used by repositories and services.

mod key_locks;
mod latest;
mod single_flight;

pub use key_locks::KeyLocks;
pub use latest::LatestRequest;
pub use single_flight::SingleFlight;
