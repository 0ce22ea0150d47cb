//! Change notification shared by the store backends.
//!
//! Each observed key gets a `watch` channel holding its current record, and a
//! collection-wide version counter is bumped on every mutation. Channels
//! without receivers are dropped on the next publish.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;

use freshcache_core::record::Record;

pub struct Observers<R: Record> {
    keys: Mutex<HashMap<R::Key, watch::Sender<Option<R>>>>,
    version: watch::Sender<u64>,
}

impl<R: Record> Default for Observers<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Observers<R> {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            keys: Mutex::new(HashMap::new()),
            version,
        }
    }

    /// Subscribes to `key`, seeding a new channel with `current`.
    ///
    /// Callers must hold the store's write exclusion while reading `current`
    /// and subscribing, so no mutation slips in between.
    pub fn subscribe(&self, key: &R::Key, current: Option<R>) -> watch::Receiver<Option<R>> {
        let mut keys = self.lock();
        match keys.get(key) {
            Some(sender) if !sender.is_closed() => sender.subscribe(),
            _ => {
                let (sender, receiver) = watch::channel(current);
                keys.insert(key.clone(), sender);
                receiver
            }
        }
    }

    /// Publishes the new value of one key.
    pub fn publish(&self, key: &R::Key, value: Option<R>) {
        {
            let mut keys = self.lock();
            if let Some(sender) = keys.get(key) {
                sender.send_replace(value);
            }
            keys.retain(|_, sender| !sender.is_closed());
        }
        self.bump();
    }

    /// Publishes a batch of key updates with a single version bump.
    pub fn publish_many<I>(&self, updates: I)
    where
        I: IntoIterator<Item = (R::Key, Option<R>)>,
    {
        {
            let mut keys = self.lock();
            for (key, value) in updates {
                if let Some(sender) = keys.get(&key) {
                    sender.send_replace(value);
                }
            }
            keys.retain(|_, sender| !sender.is_closed());
        }
        self.bump();
    }

    /// Publishes the state after a full replacement of the collection.
    ///
    /// Observed keys missing from `records` are published as `None`.
    pub fn publish_replaced(&self, records: &[R]) {
        {
            let mut keys = self.lock();
            let by_key: HashMap<R::Key, &R> = records.iter().map(|r| (r.key(), r)).collect();
            for (key, sender) in keys.iter() {
                sender.send_replace(by_key.get(key).map(|r| (*r).clone()));
            }
            keys.retain(|_, sender| !sender.is_closed());
        }
        self.bump();
    }

    /// Subscribes to the collection version counter.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<R::Key, watch::Sender<Option<R>>>> {
        self.keys.lock().unwrap_or_else(|e| e.into_inner())
    }
}
