//! Cached remote-backed repository.
//!
//! Reads are served from the local store. Refreshes pull from the remote
//! source under a freshness policy, with at most one remote call in flight
//! per refresh scope. Writes land locally first and are pushed to the remote
//! on a best-effort basis.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, RwLock, Semaphore};
use tokio_stream::wrappers::WatchStream;

use freshcache_core::cache::{decide, window_from_std, CacheEntry, FetchDecision};
use freshcache_core::clock::{Clock, SystemClock};
use freshcache_core::record::{Record, RefreshScope};
use freshcache_core::storage::{LocalStore, RemoteSource, RepositoryError, Result};

use super::ledger::FetchLedger;
use super::options::{RepositoryOptions, SyncMode};
use crate::sync::{KeyLocks, SingleFlight};

/// Result of a successful refresh call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The remote source was called and its data applied locally.
    Fetched,
    /// The data was within the freshness window; the network was not touched.
    Skipped,
}

/// Result of a local-first mutation.
#[derive(Debug, Clone)]
pub enum WriteOutcome {
    /// Applied locally and propagated to the remote source.
    Synced,
    /// Applied locally only; the remote push failed with the carried error.
    LocalOnly(RepositoryError),
}

impl WriteOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, WriteOutcome::Synced)
    }
}

struct Inner<R: Record, L, S> {
    store: Arc<L>,
    remote: Arc<S>,
    options: RepositoryOptions,
    clock: Arc<dyn Clock>,
    flights: SingleFlight<RefreshScope<R::Key>, Result<()>>,
    key_locks: KeyLocks<R::Key>,
    /// Bulk applications hold this exclusively, single-key mutations shared.
    gate: RwLock<()>,
    permits: Semaphore,
    ledger: FetchLedger<R::Key>,
}

/// Repository combining a local store with a remote source.
///
/// # Type Parameters
///
/// * `R` - The record kind
/// * `L` - The local store implementation
/// * `S` - The remote source implementation
pub struct CachedRepository<R: Record, L, S> {
    inner: Arc<Inner<R, L, S>>,
}

impl<R: Record, L, S> Clone for CachedRepository<R, L, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R, L, S> CachedRepository<R, L, S>
where
    R: Record,
    L: LocalStore<R> + 'static,
    S: RemoteSource<R> + 'static,
{
    /// Creates a repository using the system clock.
    pub fn new(store: Arc<L>, remote: Arc<S>, options: RepositoryOptions) -> Self {
        Self::with_clock(store, remote, options, Arc::new(SystemClock))
    }

    /// Creates a repository with an explicit time source.
    pub fn with_clock(
        store: Arc<L>,
        remote: Arc<S>,
        options: RepositoryOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let permits = Semaphore::new(options.fetch_permits());
        Self {
            inner: Arc::new(Inner {
                store,
                remote,
                options,
                clock,
                flights: SingleFlight::new(),
                key_locks: KeyLocks::new(),
                gate: RwLock::new(()),
                permits,
                ledger: FetchLedger::new(),
            }),
        }
    }

    pub fn store(&self) -> &Arc<L> {
        &self.inner.store
    }

    pub fn remote(&self) -> &Arc<S> {
        &self.inner.remote
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.inner.options
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Returns the local record for `key`, never touching the network.
    pub async fn read(&self, key: &R::Key) -> Result<Option<R>> {
        self.inner.store.get(key).await
    }

    pub async fn read_all(&self) -> Result<Vec<R>> {
        self.inner.store.get_all().await
    }

    /// Returns the local records belonging to `group`.
    pub async fn read_group(&self, group: &str) -> Result<Vec<R>> {
        let records = self.inner.store.get_all().await?;
        Ok(records
            .into_iter()
            .filter(|r| r.group().as_deref() == Some(group))
            .collect())
    }

    /// Returns the local record for `key` with the time it was last fetched.
    pub async fn read_entry(&self, key: &R::Key) -> Result<Option<CacheEntry<R>>> {
        let record = self.inner.store.get(key).await?;
        let fetched_at = self.last_fetched(key);
        Ok(record.map(|value| CacheEntry { value, fetched_at }))
    }

    /// Live stream of the current record for `key`, starting with its present value.
    pub async fn observe(&self, key: &R::Key) -> Result<WatchStream<Option<R>>> {
        let receiver = self.inner.store.observe(key).await?;
        Ok(WatchStream::new(receiver))
    }

    /// Version counter bumped on every change to the local collection.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.inner.store.changes()
    }

    /// Time of the last successful fetch covering `key`.
    pub fn last_fetched(&self, key: &R::Key) -> Option<DateTime<Utc>> {
        self.inner
            .ledger
            .last_fetched(&RefreshScope::Key(key.clone()))
    }

    // ------------------------------------------------------------------
    // Refreshes
    // ------------------------------------------------------------------

    /// Refreshes `key` unless it was fetched within the freshness window.
    pub async fn refresh(&self, key: &R::Key) -> Result<RefreshOutcome> {
        self.refresh_scope(RefreshScope::Key(key.clone()), false)
            .await
    }

    pub async fn force_refresh(&self, key: &R::Key) -> Result<RefreshOutcome> {
        self.refresh_scope(RefreshScope::Key(key.clone()), true)
            .await
    }

    /// Refreshes the whole collection, applied according to the sync mode.
    pub async fn refresh_all(&self) -> Result<RefreshOutcome> {
        self.refresh_scope(RefreshScope::All, false).await
    }

    pub async fn force_refresh_all(&self) -> Result<RefreshOutcome> {
        self.refresh_scope(RefreshScope::All, true).await
    }

    /// Refreshes the records of one group.
    pub async fn refresh_group(&self, group: &str) -> Result<RefreshOutcome> {
        self.refresh_scope(RefreshScope::Group(group.to_string()), false)
            .await
    }

    pub async fn force_refresh_group(&self, group: &str) -> Result<RefreshOutcome> {
        self.refresh_scope(RefreshScope::Group(group.to_string()), true)
            .await
    }

    /// Returns the record for `key`, fetching it when forced or missing locally.
    ///
    /// If the fetch fails but a local record exists, the local record is returned.
    pub async fn get(&self, key: &R::Key, force_update: bool) -> Result<R> {
        let local = self.read(key).await?;
        if !force_update {
            if let Some(record) = local {
                return Ok(record);
            }
        }

        match self.force_refresh(key).await {
            Ok(_) => self
                .read(key)
                .await?
                .ok_or_else(|| RepositoryError::not_found(key)),
            Err(err) => match local {
                Some(record) => {
                    tracing::warn!(
                        collection = R::COLLECTION,
                        key = %key,
                        error = %err,
                        "Refresh failed, serving local record"
                    );
                    Ok(record)
                }
                None => Err(err),
            },
        }
    }

    async fn refresh_scope(
        &self,
        scope: RefreshScope<R::Key>,
        force: bool,
    ) -> Result<RefreshOutcome> {
        let inner = &self.inner;

        if !force {
            let window = window_from_std(inner.options.freshness_window);
            let last = inner.ledger.last_fetched(&scope);
            if decide(inner.clock.now(), last, window) == FetchDecision::Skip {
                tracing::trace!(collection = R::COLLECTION, scope = %scope, "Data fresh, skipping fetch");
                return Ok(RefreshOutcome::Skipped);
            }
        }

        let flight = inner.clone();
        let flight_scope = scope.clone();
        inner
            .flights
            .run(scope, move || async move { flight.fetch_scope(flight_scope).await })
            .await?;

        Ok(RefreshOutcome::Fetched)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Writes `record` locally, then pushes it to the remote source.
    ///
    /// A local failure is returned as an error. A remote failure leaves the
    /// local write in place and is reported as [`WriteOutcome::LocalOnly`].
    pub async fn write(&self, record: &R) -> Result<WriteOutcome> {
        let inner = &self.inner;
        let key = record.key();

        // Held through the push so remote order matches local order per key.
        let _key_guard = inner.key_locks.lock(&key).await;

        // 1. Persist locally
        {
            let _gate = inner.gate.read().await;
            inner.store.upsert(record).await?;
        }
        tracing::debug!(collection = R::COLLECTION, key = %key, "Record written locally");

        // 2. Propagate
        match inner.call_remote(inner.remote.push(record)).await {
            Ok(()) => Ok(WriteOutcome::Synced),
            Err(err) => {
                tracing::warn!(
                    collection = R::COLLECTION,
                    key = %key,
                    error = %err,
                    "Failed to push record, kept locally"
                );
                Ok(WriteOutcome::LocalOnly(err))
            }
        }
    }

    /// Deletes `key` locally, then removes it from the remote source.
    pub async fn delete(&self, key: &R::Key) -> Result<WriteOutcome> {
        let inner = &self.inner;
        let _key_guard = inner.key_locks.lock(key).await;

        // 1. Delete locally and forget freshness
        {
            let _gate = inner.gate.read().await;
            inner.store.delete(key).await?;
        }
        inner.ledger.clear(&RefreshScope::Key(key.clone()));
        tracing::debug!(collection = R::COLLECTION, key = %key, "Record deleted locally");

        // 2. Propagate
        match inner.call_remote(inner.remote.remove(key)).await {
            Ok(()) => Ok(WriteOutcome::Synced),
            Err(err) => {
                tracing::warn!(
                    collection = R::COLLECTION,
                    key = %key,
                    error = %err,
                    "Failed to remove record remotely, deleted locally"
                );
                Ok(WriteOutcome::LocalOnly(err))
            }
        }
    }

    /// Deletes every local record matching `predicate`, then removes each
    /// one from the remote source.
    ///
    /// The local removal is applied as one batch. The outcome is
    /// [`WriteOutcome::LocalOnly`] with the first remote failure, if any.
    pub async fn delete_where<F>(&self, predicate: F) -> Result<WriteOutcome>
    where
        F: Fn(&R) -> bool,
    {
        let inner = &self.inner;

        // 1. Delete locally and forget freshness
        let removed: Vec<R::Key> = {
            let _gate = inner.gate.write().await;
            let (removed, kept): (Vec<R>, Vec<R>) = inner
                .store
                .get_all()
                .await?
                .into_iter()
                .partition(|r| predicate(r));
            if removed.is_empty() {
                return Ok(WriteOutcome::Synced);
            }
            inner.store.replace_all(&kept).await?;
            removed.iter().map(|r| r.key()).collect()
        };
        for key in &removed {
            inner.ledger.clear(&RefreshScope::Key(key.clone()));
        }
        tracing::debug!(
            collection = R::COLLECTION,
            count = removed.len(),
            "Records deleted locally"
        );

        // 2. Propagate
        let mut outcome = WriteOutcome::Synced;
        for key in &removed {
            if let Err(err) = inner.call_remote(inner.remote.remove(key)).await {
                tracing::warn!(
                    collection = R::COLLECTION,
                    key = %key,
                    error = %err,
                    "Failed to remove record remotely, deleted locally"
                );
                if outcome.is_synced() {
                    outcome = WriteOutcome::LocalOnly(err);
                }
            }
        }
        Ok(outcome)
    }

    /// Deletes every local record, then clears the remote collection.
    pub async fn delete_all(&self) -> Result<WriteOutcome> {
        let inner = &self.inner;

        // 1. Delete locally and forget freshness
        {
            let _gate = inner.gate.write().await;
            inner.store.replace_all(&[]).await?;
        }
        inner.ledger.clear_all();
        tracing::debug!(collection = R::COLLECTION, "Collection cleared locally");

        // 2. Propagate
        match inner.call_remote(inner.remote.remove_all()).await {
            Ok(()) => Ok(WriteOutcome::Synced),
            Err(err) => {
                tracing::warn!(
                    collection = R::COLLECTION,
                    error = %err,
                    "Failed to clear remote collection, cleared locally"
                );
                Ok(WriteOutcome::LocalOnly(err))
            }
        }
    }

    /// Marks `key` stale so the next refresh fetches it.
    pub fn invalidate(&self, key: &R::Key) {
        self.inner.ledger.clear(&RefreshScope::Key(key.clone()));
    }

    /// Marks every scope stale.
    pub fn invalidate_all(&self) {
        self.inner.ledger.clear_all();
    }
}

impl<R, L, S> Inner<R, L, S>
where
    R: Record,
    L: LocalStore<R> + 'static,
    S: RemoteSource<R> + 'static,
{
    /// Runs a remote call under the concurrency limit and the fetch timeout.
    ///
    /// The deadline covers the wait for a permit as well as the call itself.
    async fn call_remote<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        let limited = async {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| RepositoryError::unknown("Fetch permits closed"))?;
            call.await
        };

        match tokio::time::timeout(self.options.fetch_timeout, limited).await {
            Ok(result) => result,
            Err(_) => Err(RepositoryError::Timeout(self.options.fetch_timeout)),
        }
    }

    async fn fetch_scope(&self, scope: RefreshScope<R::Key>) -> Result<()> {
        tracing::debug!(collection = R::COLLECTION, scope = %scope, "Fetching from remote");

        let result = match &scope {
            RefreshScope::Key(key) => self.fetch_key(key).await,
            RefreshScope::Group(group) => {
                let fetched = self.call_remote(self.remote.fetch_group(group)).await;
                match fetched {
                    Ok(records) => self.apply_batch(scope.clone(), records, SyncMode::Merge).await,
                    Err(err) => Err(err),
                }
            }
            RefreshScope::All => {
                let fetched = self.call_remote(self.remote.fetch_all()).await;
                match fetched {
                    Ok(records) => {
                        self.apply_batch(scope.clone(), records, self.options.sync_mode)
                            .await
                    }
                    Err(err) => Err(err),
                }
            }
        };

        if let Err(err) = &result {
            tracing::warn!(
                collection = R::COLLECTION,
                scope = %scope,
                error = %err,
                "Refresh failed, local data unchanged"
            );
        }
        result
    }

    async fn fetch_key(&self, key: &R::Key) -> Result<()> {
        let record = self.call_remote(self.remote.fetch(key)).await?;

        // Key lock before gate, as in `write` and `delete`.
        let _key_guard = self.key_locks.lock(key).await;
        let _gate = self.gate.read().await;
        self.store.upsert(&record).await?;
        self.ledger
            .mark(RefreshScope::Key(key.clone()), [record.key()], self.clock.now());

        tracing::debug!(collection = R::COLLECTION, key = %key, "Record refreshed");
        Ok(())
    }

    async fn apply_batch(
        &self,
        scope: RefreshScope<R::Key>,
        records: Vec<R>,
        mode: SyncMode,
    ) -> Result<()> {
        let _gate = self.gate.write().await;

        match mode {
            SyncMode::Merge => self.store.upsert_all(&records).await?,
            SyncMode::Replace => self.store.replace_all(&records).await?,
        }

        let keys: Vec<R::Key> = records.iter().map(|r| r.key()).collect();
        if mode == SyncMode::Replace {
            self.ledger.retain_keys(|key| keys.contains(key));
        }
        tracing::debug!(
            collection = R::COLLECTION,
            scope = %scope,
            count = keys.len(),
            "Batch applied"
        );
        self.ledger.mark(scope, keys, self.clock.now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use freshcache_core::clock::ManualClock;
    use freshcache_core::models::Plant;
    use freshcache_core::storage::ErrorKind;
    use tokio::sync::Mutex;
    use tokio_stream::StreamExt;

    use crate::store::InMemoryStore;

    // Mock remote that tracks calls
    struct MockRemote {
        records: Mutex<HashMap<String, Plant>>,
        fetch_calls: AtomicUsize,
        fetch_all_calls: AtomicUsize,
        push_calls: AtomicUsize,
        offline: AtomicBool,
        delay: Duration,
    }

    impl MockRemote {
        fn new(records: impl IntoIterator<Item = Plant>) -> Self {
            Self {
                records: Mutex::new(records.into_iter().map(|p| (p.plant_id.clone(), p)).collect()),
                fetch_calls: AtomicUsize::new(0),
                fetch_all_calls: AtomicUsize::new(0),
                push_calls: AtomicUsize::new(0),
                offline: AtomicBool::new(false),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn go_offline(&self) {
            self.offline.store(true, Ordering::SeqCst);
        }

        async fn check(&self) -> Result<()> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.offline.load(Ordering::SeqCst) {
                return Err(RepositoryError::network("offline"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RemoteSource<Plant> for MockRemote {
        async fn fetch(&self, key: &String) -> Result<Plant> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            self.check().await?;
            self.records
                .lock()
                .await
                .get(key)
                .cloned()
                .ok_or_else(|| RepositoryError::not_found(key))
        }

        async fn fetch_all(&self) -> Result<Vec<Plant>> {
            self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
            self.check().await?;
            Ok(self.records.lock().await.values().cloned().collect())
        }

        async fn push(&self, record: &Plant) -> Result<()> {
            self.push_calls.fetch_add(1, Ordering::SeqCst);
            self.check().await?;
            self.records
                .lock()
                .await
                .insert(record.plant_id.clone(), record.clone());
            Ok(())
        }

        async fn remove(&self, key: &String) -> Result<()> {
            self.check().await?;
            self.records.lock().await.remove(key);
            Ok(())
        }
    }

    type TestRepository = CachedRepository<Plant, InMemoryStore<Plant>, MockRemote>;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn setup(remote: MockRemote) -> (TestRepository, Arc<MockRemote>, Arc<ManualClock>) {
        let remote = Arc::new(remote);
        let clock = Arc::new(ManualClock::new(start()));
        let repo = CachedRepository::with_clock(
            Arc::new(InMemoryStore::new()),
            remote.clone(),
            RepositoryOptions::default(),
            clock.clone(),
        );
        (repo, remote, clock)
    }

    fn rose() -> Plant {
        Plant::new("rosa", "Rose", 9)
    }

    #[tokio::test]
    async fn test_read_never_touches_remote() {
        let (repo, remote, _) = setup(MockRemote::new([rose()]));

        let result = repo.read(&"rosa".to_string()).await.unwrap();

        assert_eq!(result, None);
        assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_fetches_then_skips_while_fresh() {
        let (repo, remote, clock) = setup(MockRemote::new([rose()]));
        let key = "rosa".to_string();

        assert_eq!(repo.refresh(&key).await.unwrap(), RefreshOutcome::Fetched);
        assert_eq!(repo.read(&key).await.unwrap(), Some(rose()));

        clock.advance(chrono::Duration::seconds(150));
        assert_eq!(repo.refresh(&key).await.unwrap(), RefreshOutcome::Skipped);
        assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 1);

        clock.advance(chrono::Duration::seconds(450));
        assert_eq!(repo.refresh(&key).await.unwrap(), RefreshOutcome::Fetched);
        assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_force_refresh_ignores_freshness() {
        let (repo, remote, _) = setup(MockRemote::new([rose()]));
        let key = "rosa".to_string();

        repo.refresh(&key).await.unwrap();
        assert_eq!(repo.force_refresh(&key).await.unwrap(), RefreshOutcome::Fetched);

        assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_next_fetch() {
        let (repo, remote, _) = setup(MockRemote::new([rose()]));
        let key = "rosa".to_string();

        repo.refresh(&key).await.unwrap();
        repo.invalidate(&key);
        repo.refresh(&key).await.unwrap();

        assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_refreshes_share_one_fetch() {
        let remote = MockRemote::new([rose()]).with_delay(Duration::from_millis(100));
        let (repo, remote, _) = setup(remote);
        let key = "rosa".to_string();

        let (a, b, c) = tokio::join!(repo.refresh(&key), repo.refresh(&key), repo.refresh(&key));

        assert_eq!(a.unwrap(), RefreshOutcome::Fetched);
        assert_eq!(b.unwrap(), RefreshOutcome::Fetched);
        assert_eq!(c.unwrap(), RefreshOutcome::Fetched);
        assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_snapshot() {
        let (repo, remote, _) = setup(MockRemote::new([rose()]));
        let key = "rosa".to_string();
        repo.refresh(&key).await.unwrap();
        remote.go_offline();

        let err = repo.force_refresh(&key).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NetworkUnavailable);
        assert_eq!(repo.read(&key).await.unwrap(), Some(rose()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_remote_times_out() {
        let remote = MockRemote::new([rose()]).with_delay(Duration::from_secs(30));
        let (repo, _, _) = setup(remote);
        let key = "rosa".to_string();

        let err = repo.refresh(&key).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Timeout(d) if d == Duration::from_secs(5)));
        assert_eq!(repo.read(&key).await.unwrap(), None);
        assert_eq!(repo.last_fetched(&key), None);
    }

    #[tokio::test]
    async fn test_refresh_all_marks_keys_fresh() {
        let (repo, remote, _) = setup(MockRemote::new([rose(), Plant::new("tulipa", "Tulip", 5)]));

        repo.refresh_all().await.unwrap();
        let outcome = repo.refresh(&"tulipa".to_string()).await.unwrap();

        assert_eq!(outcome, RefreshOutcome::Skipped);
        assert_eq!(remote.fetch_all_calls.load(Ordering::SeqCst), 1);
        assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(repo.read_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_group_uses_default_filter() {
        let (repo, _, _) = setup(MockRemote::new([rose(), Plant::new("tulipa", "Tulip", 5)]));

        repo.refresh_group("5").await.unwrap();

        let all = repo.read_all().await.unwrap();
        assert_eq!(all, vec![Plant::new("tulipa", "Tulip", 5)]);
        assert_eq!(repo.read_group("5").await.unwrap().len(), 1);
        assert!(repo.read_group("9").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_mode_drops_records_missing_remotely() {
        let remote = Arc::new(MockRemote::new([rose()]));
        let store = Arc::new(InMemoryStore::with_records([Plant::new("old", "Old", 1)]));
        let repo = CachedRepository::new(
            store,
            remote,
            RepositoryOptions::default().with_sync_mode(SyncMode::Replace),
        );

        repo.refresh_all().await.unwrap();

        assert_eq!(repo.read_all().await.unwrap(), vec![rose()]);
    }

    #[tokio::test]
    async fn test_write_then_read_offline() {
        let (repo, remote, _) = setup(MockRemote::new([]));
        remote.go_offline();

        let outcome = repo.write(&rose()).await.unwrap();

        assert!(matches!(outcome, WriteOutcome::LocalOnly(ref e) if e.kind() == ErrorKind::NetworkUnavailable));
        assert_eq!(repo.read(&"rosa".to_string()).await.unwrap(), Some(rose()));
    }

    #[tokio::test]
    async fn test_write_pushes_when_online() {
        let (repo, remote, _) = setup(MockRemote::new([]));

        let outcome = repo.write(&rose()).await.unwrap();

        assert!(outcome.is_synced());
        assert_eq!(remote.push_calls.load(Ordering::SeqCst), 1);
        assert!(remote.records.lock().await.contains_key("rosa"));
    }

    #[tokio::test]
    async fn test_delete_clears_record_and_freshness() {
        let (repo, remote, _) = setup(MockRemote::new([rose()]));
        let key = "rosa".to_string();
        repo.refresh(&key).await.unwrap();

        let outcome = repo.delete(&key).await.unwrap();

        assert!(outcome.is_synced());
        assert_eq!(repo.read(&key).await.unwrap(), None);
        assert_eq!(repo.last_fetched(&key), None);
        assert!(remote.records.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_falls_back_to_local_on_failure() {
        let (repo, remote, _) = setup(MockRemote::new([rose()]));
        let key = "rosa".to_string();
        repo.refresh(&key).await.unwrap();
        remote.go_offline();

        let plant = repo.get(&key, true).await.unwrap();

        assert_eq!(plant, rose());
    }

    #[tokio::test]
    async fn test_get_missing_everywhere_is_not_found() {
        let (repo, _, _) = setup(MockRemote::new([]));

        let err = repo.get(&"ghost".to_string(), false).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_get_uses_local_without_force() {
        let (repo, remote, _) = setup(MockRemote::new([rose()]));
        let key = "rosa".to_string();
        repo.refresh(&key).await.unwrap();

        repo.get(&key, false).await.unwrap();

        assert_eq!(remote.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_observe_emits_current_then_refreshed() {
        let (repo, _, _) = setup(MockRemote::new([rose()]));
        let key = "rosa".to_string();
        let mut stream = repo.observe(&key).await.unwrap();

        assert_eq!(stream.next().await, Some(None));

        repo.refresh(&key).await.unwrap();
        assert_eq!(stream.next().await, Some(Some(rose())));
    }

    #[tokio::test]
    async fn test_read_entry_carries_fetch_time() {
        let (repo, _, clock) = setup(MockRemote::new([rose()]));
        let key = "rosa".to_string();
        repo.refresh(&key).await.unwrap();

        let entry = repo.read_entry(&key).await.unwrap().unwrap();

        assert_eq!(entry.value, rose());
        assert_eq!(entry.fetched_at, Some(clock.now()));
    }
}
