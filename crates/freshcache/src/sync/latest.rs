//! Single-slot "latest request wins" task launcher.
//!
//! Launching a task aborts the previously launched one if it is still
//! running, so only the work for the most recent input survives. Useful for
//! filter changes that arrive faster than the refreshes they trigger.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

struct Slot {
    generation: AtomicU64,
    current: Mutex<Option<AbortHandle>>,
    busy: watch::Sender<bool>,
}

/// Runs at most one task at a time, replacing the running one on each launch.
#[derive(Clone)]
pub struct LatestRequest {
    slot: Arc<Slot>,
}

impl Default for LatestRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl LatestRequest {
    pub fn new() -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            slot: Arc::new(Slot {
                generation: AtomicU64::new(0),
                current: Mutex::new(None),
                busy,
            }),
        }
    }

    /// Aborts the running task (if any) and spawns `task` in its place.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.slot.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.slot.busy.send_replace(true);

        let slot = self.slot.clone();
        let handle = tokio::spawn(async move {
            task.await;
            // A newer launch owns the busy flag now.
            if slot.generation.load(Ordering::SeqCst) == generation {
                slot.busy.send_replace(false);
            }
        });

        let previous = self
            .slot
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(handle.abort_handle());
        if let Some(previous) = previous {
            if !previous.is_finished() {
                tracing::debug!("Cancelling superseded request");
            }
            previous.abort();
        }

        handle
    }

    /// Aborts the running task without launching a new one.
    pub fn cancel(&self) {
        self.slot.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(current) = self
            .slot
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            current.abort();
        }
        self.slot.busy.send_replace(false);
    }

    /// Whether the latest launched task is still running.
    pub fn is_busy(&self) -> bool {
        *self.slot.busy.borrow()
    }

    /// Subscribes to the busy flag.
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.slot.busy.subscribe()
    }
}
