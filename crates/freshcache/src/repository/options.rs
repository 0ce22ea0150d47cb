use std::time::Duration;

/// Default freshness window (5 minutes).
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(300);

/// Default timeout for a single remote call.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of remote calls allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// How a full refresh is applied to the local store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Upsert fetched records, keeping local records the remote did not return.
    #[default]
    Merge,
    /// Replace the whole collection with the fetched records.
    Replace,
}

/// Tuning knobs for a [`CachedRepository`](super::CachedRepository).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOptions {
    pub freshness_window: Duration,
    pub fetch_timeout: Duration,
    pub max_concurrent_fetches: usize,
    pub sync_mode: SyncMode,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            sync_mode: SyncMode::Merge,
        }
    }
}

impl RepositoryOptions {
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Sets the fetch concurrency limit. Zero is treated as one.
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max;
        self
    }

    pub fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }

    pub(crate) fn fetch_permits(&self) -> usize {
        self.max_concurrent_fetches.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RepositoryOptions::default();
        assert_eq!(options.freshness_window, Duration::from_secs(300));
        assert_eq!(options.fetch_timeout, Duration::from_secs(5));
        assert_eq!(options.max_concurrent_fetches, 4);
        assert_eq!(options.sync_mode, SyncMode::Merge);
    }

    #[test]
    fn test_zero_concurrency_still_allows_one_fetch() {
        let options = RepositoryOptions::default().with_max_concurrent_fetches(0);
        assert_eq!(options.fetch_permits(), 1);
    }
}
