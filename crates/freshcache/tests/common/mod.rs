//! Shared fakes for repository integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use freshcache_core::record::Record;
use freshcache_core::storage::{RemoteSource, RepositoryError, Result};

/// Remote operations that can be slowed down individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    Fetch,
    FetchAll,
    Push,
    Remove,
}

/// Remote source backed by a map, with call counters and failure switches.
pub struct FakeRemote<R: Record> {
    records: Mutex<HashMap<R::Key, R>>,
    delay: Mutex<Duration>,
    call_delays: Mutex<HashMap<Call, Duration>>,
    offline: AtomicBool,
    pub fetch_calls: AtomicUsize,
    pub fetch_all_calls: AtomicUsize,
    pub push_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
}

impl<R: Record> FakeRemote<R> {
    pub fn new(records: impl IntoIterator<Item = R>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().map(|r| (r.key(), r)).collect()),
            delay: Mutex::new(Duration::ZERO),
            call_delays: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
            fetch_calls: AtomicUsize::new(0),
            fetch_all_calls: AtomicUsize::new(0),
            push_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Overrides the delay of one kind of call.
    pub fn set_call_delay(&self, call: Call, delay: Duration) {
        self.call_delays.lock().unwrap().insert(call, delay);
    }

    pub fn insert(&self, record: R) {
        self.records.lock().unwrap().insert(record.key(), record);
    }

    pub fn remove_record(&self, key: &R::Key) {
        self.records.lock().unwrap().remove(key);
    }

    pub fn get(&self, key: &R::Key) -> Option<R> {
        self.records.lock().unwrap().get(key).cloned()
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    async fn respond(&self, call: Call) -> Result<()> {
        let delay = self
            .call_delays
            .lock()
            .unwrap()
            .get(&call)
            .copied()
            .unwrap_or_else(|| *self.delay.lock().unwrap());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::network("remote offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Record> RemoteSource<R> for FakeRemote<R> {
    async fn fetch(&self, key: &R::Key) -> Result<R> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(Call::Fetch).await?;
        self.get(key).ok_or_else(|| RepositoryError::not_found(key))
    }

    async fn fetch_all(&self) -> Result<Vec<R>> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(Call::FetchAll).await?;
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn push(&self, record: &R) -> Result<()> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(Call::Push).await?;
        self.insert(record.clone());
        Ok(())
    }

    async fn remove(&self, key: &R::Key) -> Result<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(Call::Remove).await?;
        self.remove_record(key);
        Ok(())
    }
}
