//! freshcache_client - HTTP remote source for freshcache repositories.

pub mod client;
pub mod error;

pub use client::{HttpClient, HttpRemoteSource};
pub use error::{ClientError, Result};
