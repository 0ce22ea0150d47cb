//! Single-flight cache for a value derived from a fallible computation.
//!
//! Success is memoized; failure yields a fallback and is retried on the next
//! access.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use freshcache_core::cache::CacheEntry;
use freshcache_core::clock::{Clock, SystemClock};
use freshcache_core::storage::Result;

use crate::sync::SingleFlight;

struct Memo<T> {
    /// Bumped on every invalidation.
    epoch: u64,
    entry: Option<CacheEntry<T>>,
}

/// Caches the result of a computation, computing it at most once at a time.
pub struct DerivedCache<T> {
    fallback: T,
    memo: Mutex<Memo<T>>,
    flights: SingleFlight<u64, Result<T>>,
    clock: Arc<dyn Clock>,
}

impl<T> DerivedCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache returning `fallback` when computation fails.
    pub fn new(fallback: T) -> Self {
        Self::with_clock(fallback, Arc::new(SystemClock))
    }

    pub fn with_clock(fallback: T, clock: Arc<dyn Clock>) -> Self {
        Self {
            fallback,
            memo: Mutex::new(Memo {
                epoch: 0,
                entry: None,
            }),
            flights: SingleFlight::new(),
            clock,
        }
    }

    /// Returns the memoized value, or runs `compute` to produce it.
    ///
    /// Concurrent callers share one computation. On failure the fallback is
    /// returned and nothing is memoized. A result whose computation started
    /// before an [`invalidate`](Self::invalidate) is returned but not kept.
    pub async fn get_or_compute<F, Fut>(&self, compute: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let epoch = {
            let memo = self.lock();
            if let Some(entry) = &memo.entry {
                tracing::trace!("Derived value cache hit");
                return entry.value.clone();
            }
            memo.epoch
        };

        match self.flights.run(epoch, compute).await {
            Ok(value) => {
                let mut memo = self.lock();
                if memo.epoch == epoch && memo.entry.is_none() {
                    memo.entry = Some(CacheEntry::fetched(value.clone(), self.clock.now()));
                }
                value
            }
            Err(err) => {
                tracing::warn!(error = %err, "Derived value computation failed, using fallback");
                self.fallback.clone()
            }
        }
    }

    /// Clears the memo so the next access recomputes.
    pub fn invalidate(&self) {
        let mut memo = self.lock();
        memo.epoch = memo.epoch.wrapping_add(1);
        memo.entry = None;
    }

    /// Returns the memoized value without computing.
    pub fn peek(&self) -> Option<T> {
        self.lock().entry.as_ref().map(|e| e.value.clone())
    }

    /// Returns the memoized value with its computation time.
    pub fn entry(&self) -> Option<CacheEntry<T>> {
        self.lock().entry.clone()
    }

    pub fn fallback(&self) -> &T {
        &self.fallback
    }

    fn lock(&self) -> MutexGuard<'_, Memo<T>> {
        self.memo.lock().unwrap_or_else(|e| e.into_inner())
    }
}
