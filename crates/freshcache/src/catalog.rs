//! Plant catalog: a grow-zone filtered, custom-sorted view over the plant repository.
//!
//! Selecting a grow zone refreshes that zone from the remote source. A newer
//! selection cancels the refresh started by the previous one.

use std::sync::Arc;

use futures_util::Stream;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use freshcache_core::models::{GrowZone, Plant};
use freshcache_core::sorting::sort_by_custom_order;
use freshcache_core::storage::{LocalStore, RemoteSource, RepositoryError, Result, SortOrderSource};

use crate::cache::DerivedCache;
use crate::repository::CachedRepository;
use crate::sync::LatestRequest;

struct CatalogInner<L, S, O> {
    repository: CachedRepository<Plant, L, S>,
    order_source: Arc<O>,
    sort_order: DerivedCache<Vec<String>>,
    grow_zone: watch::Sender<Option<GrowZone>>,
    refresher: LatestRequest,
    errors: watch::Sender<Option<String>>,
}

/// Filtered and sorted plant listing backed by a [`CachedRepository`].
pub struct PlantCatalog<L, S, O> {
    inner: Arc<CatalogInner<L, S, O>>,
}

impl<L, S, O> Clone for PlantCatalog<L, S, O> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<L, S, O> PlantCatalog<L, S, O>
where
    L: LocalStore<Plant> + 'static,
    S: RemoteSource<Plant> + 'static,
    O: SortOrderSource + 'static,
{
    /// Creates a catalog with no grow zone selected.
    ///
    /// A failed sort order fetch falls back to alphabetical order.
    pub fn new(repository: CachedRepository<Plant, L, S>, order_source: Arc<O>) -> Self {
        let (grow_zone, _) = watch::channel(None);
        let (errors, _) = watch::channel(None);
        Self {
            inner: Arc::new(CatalogInner {
                repository,
                order_source,
                sort_order: DerivedCache::new(Vec::new()),
                grow_zone,
                refresher: LatestRequest::new(),
                errors,
            }),
        }
    }

    pub fn repository(&self) -> &CachedRepository<Plant, L, S> {
        &self.inner.repository
    }

    /// Filters to `zone` and refreshes it.
    pub fn set_grow_zone(&self, zone: GrowZone) -> JoinHandle<()> {
        self.select_grow_zone(Some(zone));
        self.refresh()
    }

    /// Removes the filter and refreshes every plant.
    pub fn clear_grow_zone(&self) -> JoinHandle<()> {
        self.select_grow_zone(None);
        self.refresh()
    }

    /// Changes the filter without refreshing.
    pub fn select_grow_zone(&self, zone: Option<GrowZone>) {
        self.inner.grow_zone.send_replace(zone);
    }

    pub fn is_filtered(&self) -> bool {
        self.inner.grow_zone.borrow().is_some()
    }

    pub fn grow_zone(&self) -> Option<GrowZone> {
        *self.inner.grow_zone.borrow()
    }

    /// Refreshes the current selection, replacing any refresh still running.
    ///
    /// Failures are published on [`errors`](Self::errors).
    pub fn refresh(&self) -> JoinHandle<()> {
        let zone = self.grow_zone();
        let inner = self.inner.clone();

        self.inner.refresher.launch(async move {
            let result = match zone {
                Some(zone) => inner.repository.refresh_group(&zone.group()).await,
                None => inner.repository.refresh_all().await,
            };
            match result {
                Ok(outcome) => {
                    tracing::debug!(grow_zone = ?zone, ?outcome, "Catalog refresh finished");
                }
                Err(err) => {
                    tracing::warn!(grow_zone = ?zone, error = %err, "Catalog refresh failed");
                    inner.errors.send_replace(Some(err.to_string()));
                }
            }
        })
    }

    /// Current local plants for the selected zone, custom order first.
    pub async fn plants(&self) -> Result<Vec<Plant>> {
        let zone = self.grow_zone();
        let mut plants = match zone {
            Some(zone) => self.inner.repository.read_group(&zone.group()).await?,
            None => self.inner.repository.read_all().await?,
        };

        let order = self.sort_order().await;
        sort_by_custom_order(&mut plants, &order);
        Ok(plants)
    }

    /// Custom sort order, fetched once and memoized on success.
    pub async fn sort_order(&self) -> Vec<String> {
        let source = self.inner.order_source.clone();
        let timeout = self.inner.repository.options().fetch_timeout;

        self.inner
            .sort_order
            .get_or_compute(move || async move {
                tokio::time::timeout(timeout, source.sort_order())
                    .await
                    .map_err(|_| RepositoryError::Timeout(timeout))?
            })
            .await
    }

    /// Forgets the memoized sort order.
    pub fn invalidate_sort_order(&self) {
        self.inner.sort_order.invalidate();
    }

    /// Stream of the sorted plant list.
    ///
    /// Yields once on subscription, then again whenever the local store
    /// changes or another grow zone is selected.
    pub fn watch_plants(&self) -> impl Stream<Item = Result<Vec<Plant>>> + Send + 'static {
        let catalog = self.clone();
        let mut changes = self.inner.repository.changes();
        let mut zone = self.inner.grow_zone.subscribe();

        async_stream::stream! {
            loop {
                yield catalog.plants().await;

                tokio::select! {
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = zone.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Spinner state: true while the latest refresh runs.
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.inner.refresher.busy()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.refresher.is_busy()
    }

    /// Last refresh error not yet acknowledged.
    pub fn errors(&self) -> watch::Receiver<Option<String>> {
        self.inner.errors.subscribe()
    }

    pub fn acknowledge_error(&self) {
        self.inner.errors.send_replace(None);
    }
}
