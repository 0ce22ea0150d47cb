use async_trait::async_trait;
use tokio::sync::watch;

use crate::record::Record;

use super::Result;

/// Durable key-indexed persistence of records.
///
/// Every mutation is atomic: readers observe either the state before or
/// after it, never a partial batch. Failures are reported as
/// [`RepositoryError::Unknown`](super::RepositoryError::Unknown).
#[async_trait]
pub trait LocalStore<R: Record>: Send + Sync {
    /// Gets a record by its key.
    async fn get(&self, key: &R::Key) -> Result<Option<R>>;

    /// Gets every record of the collection.
    async fn get_all(&self) -> Result<Vec<R>>;

    /// Inserts or replaces a record.
    async fn upsert(&self, record: &R) -> Result<()>;

    /// Inserts or replaces a batch of records atomically.
    async fn upsert_all(&self, records: &[R]) -> Result<()>;

    /// Replaces the whole collection with `records` atomically.
    async fn replace_all(&self, records: &[R]) -> Result<()>;

    /// Deletes a record by its key. Deleting a missing key is not an error.
    async fn delete(&self, key: &R::Key) -> Result<()>;

    /// Subscribes to the current value of a key.
    ///
    /// The receiver starts with the current record (or `None`) and is
    /// updated on every subsequent mutation of that key.
    async fn observe(&self, key: &R::Key) -> Result<watch::Receiver<Option<R>>>;

    /// Subscribes to a version counter bumped on every mutation.
    fn changes(&self) -> watch::Receiver<u64>;
}

/// Fallible, asynchronous provider of authoritative records.
///
/// Implementations translate transport failures into the
/// [`RepositoryError`](super::RepositoryError) taxonomy. Callers impose timeouts.
#[async_trait]
pub trait RemoteSource<R: Record>: Send + Sync {
    /// Fetches a single record.
    async fn fetch(&self, key: &R::Key) -> Result<R>;

    /// Fetches every record of the collection.
    async fn fetch_all(&self) -> Result<Vec<R>>;

    /// Fetches the records of one group.
    ///
    /// The default filters [`fetch_all`](Self::fetch_all) by [`Record::group`].
    async fn fetch_group(&self, group: &str) -> Result<Vec<R>> {
        let records = self.fetch_all().await?;
        Ok(records
            .into_iter()
            .filter(|r| r.group().as_deref() == Some(group))
            .collect())
    }

    /// Pushes a locally written record to the remote.
    async fn push(&self, record: &R) -> Result<()>;

    /// Removes a record from the remote.
    async fn remove(&self, key: &R::Key) -> Result<()>;

    /// Removes every record of the collection.
    ///
    /// The default removes each record returned by [`fetch_all`](Self::fetch_all).
    async fn remove_all(&self) -> Result<()> {
        for record in self.fetch_all().await? {
            self.remove(&record.key()).await?;
        }
        Ok(())
    }
}

/// Provider of a custom display order for a collection's keys.
#[async_trait]
pub trait SortOrderSource: Send + Sync {
    /// Returns keys in the order they should be listed first.
    async fn sort_order(&self) -> Result<Vec<String>>;
}
