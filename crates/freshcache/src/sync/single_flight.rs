//! Coalescing of concurrent identical requests.
//!
//! The group keeps only weak handles to in-flight work; every caller holds a
//! strong one. Dropping one caller leaves the work running for the others,
//! and when the last caller goes away the work is dropped with it.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use futures_util::future::{BoxFuture, FutureExt, Shared, WeakShared};

type SharedCall<V> = Shared<BoxFuture<'static, V>>;

struct Call<V> {
    id: u64,
    future: WeakShared<BoxFuture<'static, V>>,
}

/// A group of keyed calls where at most one call per key is in flight.
pub struct SingleFlight<K, V> {
    calls: Mutex<HashMap<K, Call<V>>>,
    next_id: AtomicU64,
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Runs the future built by `make` unless a call for `key` is already in
    /// flight, in which case its outcome is awaited instead.
    ///
    /// `make` is only invoked by the caller that starts the flight.
    pub async fn run<F, Fut>(&self, key: K, make: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let (id, call) = self.join_or_start(&key, make);
        let value = call.await;
        self.finish(&key, id);
        value
    }

    /// Returns true if a call for `key` is currently in flight.
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.lock()
            .get(key)
            .is_some_and(|call| call.future.upgrade().is_some())
    }

    /// Number of keys with a live in-flight call.
    pub fn in_flight_count(&self) -> usize {
        self.lock()
            .values()
            .filter(|call| call.future.upgrade().is_some())
            .count()
    }

    fn join_or_start<F, Fut>(&self, key: &K, make: F) -> (u64, SharedCall<V>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let mut calls = self.lock();

        if let Some(existing) = calls.get(key) {
            if let Some(shared) = existing.future.upgrade() {
                tracing::trace!("Joining in-flight call");
                return (existing.id, shared);
            }
        }

        // Abandoned calls whose callers were all dropped leave dead entries.
        calls.retain(|_, call| call.future.upgrade().is_some());

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let shared = make().boxed().shared();
        if let Some(weak) = shared.downgrade() {
            calls.insert(key.clone(), Call { id, future: weak });
        }
        (id, shared)
    }

    fn finish(&self, key: &K, id: u64) {
        let mut calls = self.lock();
        if calls.get(key).is_some_and(|call| call.id == id) {
            calls.remove(key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Call<V>>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}
