//! Local-only application log backed by a [`LocalStore`].

use std::sync::Arc;

use freshcache_core::clock::{Clock, SystemClock};
use freshcache_core::models::Log;
use freshcache_core::storage::{LocalStore, Result};

/// Records messages in a local store and lists them newest first.
pub struct Logger<L> {
    store: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> Clone for Logger<L> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<L: LocalStore<Log> + 'static> Logger<L> {
    pub fn new(store: Arc<L>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Appends `msg` stamped with the current time.
    pub async fn add_log(&self, msg: impl Into<String>) -> Result<Log> {
        let log = Log::new(msg, self.clock.now());
        self.store.upsert(&log).await?;
        tracing::debug!(id = %log.id, "Log added");
        Ok(log)
    }

    /// Returns every log, newest first.
    pub async fn all_logs(&self) -> Result<Vec<Log>> {
        let mut logs = self.store.get_all().await?;
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(logs)
    }

    /// Removes every log.
    pub async fn remove_logs(&self) -> Result<()> {
        self.store.replace_all(&[]).await?;
        tracing::debug!("Logs removed");
        Ok(())
    }
}
