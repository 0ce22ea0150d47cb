//! In-memory store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};

use freshcache_core::record::Record;
use freshcache_core::storage::{LocalStore, Result};

use crate::store::observers::Observers;

/// In-memory local store.
///
/// Uses a HashMap wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the store is dropped.
pub struct InMemoryStore<R: Record> {
    records: Arc<RwLock<HashMap<R::Key, R>>>,
    observers: Arc<Observers<R>>,
}

impl<R: Record> Clone for InMemoryStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl<R: Record> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> InMemoryStore<R> {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            observers: Arc::new(Observers::new()),
        }
    }

    /// Creates a store pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let map = records.into_iter().map(|r| (r.key(), r)).collect();
        Self {
            records: Arc::new(RwLock::new(map)),
            observers: Arc::new(Observers::new()),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl<R: Record> LocalStore<R> for InMemoryStore<R> {
    async fn get(&self, key: &R::Key) -> Result<Option<R>> {
        let records = self.records.read().await;
        Ok(records.get(key).cloned())
    }

    async fn get_all(&self) -> Result<Vec<R>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn upsert(&self, record: &R) -> Result<()> {
        let mut records = self.records.write().await;
        let key = record.key();
        records.insert(key.clone(), record.clone());
        self.observers.publish(&key, Some(record.clone()));
        Ok(())
    }

    async fn upsert_all(&self, batch: &[R]) -> Result<()> {
        let mut records = self.records.write().await;
        for record in batch {
            records.insert(record.key(), record.clone());
        }
        self.observers
            .publish_many(batch.iter().map(|r| (r.key(), Some(r.clone()))));
        Ok(())
    }

    async fn replace_all(&self, batch: &[R]) -> Result<()> {
        let mut records = self.records.write().await;
        *records = batch.iter().map(|r| (r.key(), r.clone())).collect();
        self.observers.publish_replaced(batch);
        Ok(())
    }

    async fn delete(&self, key: &R::Key) -> Result<()> {
        let mut records = self.records.write().await;
        if records.remove(key).is_some() {
            self.observers.publish(key, None);
        }
        Ok(())
    }

    async fn observe(&self, key: &R::Key) -> Result<watch::Receiver<Option<R>>> {
        let records = self.records.read().await;
        Ok(self.observers.subscribe(key, records.get(key).cloned()))
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.observers.changes()
    }
}
