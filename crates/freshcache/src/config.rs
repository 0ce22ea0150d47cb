use std::{env, time::Duration};

use crate::repository::{RepositoryOptions, SyncMode};

/// Configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Freshness window in seconds (default: 300)
    pub freshness_window_seconds: u64,
    /// Timeout for a single remote call in milliseconds (default: 5,000)
    pub fetch_timeout_ms: u64,
    /// Maximum number of remote calls in flight (default: 4)
    pub max_concurrent_fetches: usize,
    /// Path to SQLite database file (default: "freshcache.db")
    pub sqlite_path: String,
    /// Base URL of the remote source (default: "http://localhost:3000")
    pub remote_url: String,
    /// Replace the local collection on full refreshes instead of merging (default: false)
    pub full_sync: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `FRESHNESS_WINDOW_SECONDS` - Freshness window in seconds (default: 300)
    /// - `FETCH_TIMEOUT_MS` - Remote call timeout in milliseconds (default: 5,000)
    /// - `MAX_CONCURRENT_FETCHES` - Remote call concurrency (default: 4)
    /// - `SQLITE_PATH` - SQLite database path (default: "freshcache.db")
    /// - `REMOTE_URL` - Remote base URL (default: "http://localhost:3000")
    /// - `FULL_SYNC` - `true` to replace the collection on full refreshes (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |name: &str| lookup(name).and_then(|v| v.trim().parse().ok());
        Self {
            freshness_window_seconds: parsed("FRESHNESS_WINDOW_SECONDS").unwrap_or(300),
            fetch_timeout_ms: parsed("FETCH_TIMEOUT_MS").unwrap_or(5_000),
            max_concurrent_fetches: lookup("MAX_CONCURRENT_FETCHES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(4),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "freshcache.db".to_string()),
            remote_url: lookup("REMOTE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            full_sync: lookup("FULL_SYNC")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(false),
        }
    }

    /// Get the freshness window as a Duration.
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_seconds)
    }

    /// Get the fetch timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Builds repository options from this configuration.
    pub fn repository_options(&self) -> RepositoryOptions {
        let sync_mode = if self.full_sync {
            SyncMode::Replace
        } else {
            SyncMode::Merge
        };
        RepositoryOptions::default()
            .with_freshness_window(self.freshness_window())
            .with_fetch_timeout(self.fetch_timeout())
            .with_max_concurrent_fetches(self.max_concurrent_fetches)
            .with_sync_mode(sync_mode)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
