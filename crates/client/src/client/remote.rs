//! `RemoteSource` implementation over HTTP.

use std::marker::PhantomData;

use async_trait::async_trait;

use freshcache_core::record::Record;
use freshcache_core::storage::{RemoteSource, Result, SortOrderSource};

use super::HttpClient;

/// Remote source serving one record collection over REST.
///
/// Endpoints, relative to the client's base URL:
///
/// - `GET /{collection}/{key}` - one record
/// - `GET /{collection}` - every record
/// - `GET /{collection}?group={group}` - records of one group
/// - `PUT /{collection}/{key}` - upload a record
/// - `DELETE /{collection}/{key}` - remove a record
/// - `DELETE /{collection}` - remove every record
/// - `GET /{collection}/sort-order` - custom display order, a JSON array of keys
pub struct HttpRemoteSource<R> {
    client: HttpClient,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> HttpRemoteSource<R> {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    fn collection_path() -> String {
        format!("/{}", R::COLLECTION)
    }

    fn record_path(key: &R::Key) -> String {
        format!(
            "/{}/{}",
            R::COLLECTION,
            urlencoding::encode(&key.to_string())
        )
    }
}

impl<R> Clone for HttpRemoteSource<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Record> RemoteSource<R> for HttpRemoteSource<R> {
    async fn fetch(&self, key: &R::Key) -> Result<R> {
        tracing::debug!(collection = R::COLLECTION, %key, "Fetching record");
        self.client
            .get_json(&Self::record_path(key))
            .await
            .map_err(|e| e.into_repository_error(self.client.timeout()))
    }

    async fn fetch_all(&self) -> Result<Vec<R>> {
        tracing::debug!(collection = R::COLLECTION, "Fetching collection");
        self.client
            .get_json(&Self::collection_path())
            .await
            .map_err(|e| e.into_repository_error(self.client.timeout()))
    }

    async fn fetch_group(&self, group: &str) -> Result<Vec<R>> {
        tracing::debug!(collection = R::COLLECTION, group, "Fetching group");
        self.client
            .get_json_with_query(&Self::collection_path(), &[("group", group)])
            .await
            .map_err(|e| e.into_repository_error(self.client.timeout()))
    }

    async fn push(&self, record: &R) -> Result<()> {
        self.client
            .put_json(&Self::record_path(&record.key()), record)
            .await
            .map_err(|e| e.into_repository_error(self.client.timeout()))
    }

    async fn remove(&self, key: &R::Key) -> Result<()> {
        self.client
            .delete(&Self::record_path(key))
            .await
            .map_err(|e| e.into_repository_error(self.client.timeout()))
    }

    async fn remove_all(&self) -> Result<()> {
        tracing::debug!(collection = R::COLLECTION, "Removing collection");
        self.client
            .delete(&Self::collection_path())
            .await
            .map_err(|e| e.into_repository_error(self.client.timeout()))
    }
}

#[async_trait]
impl<R: Record> SortOrderSource for HttpRemoteSource<R> {
    async fn sort_order(&self) -> Result<Vec<String>> {
        tracing::debug!(collection = R::COLLECTION, "Fetching custom sort order");
        self.client
            .get_json(&format!("/{}/sort-order", R::COLLECTION))
            .await
            .map_err(|e| e.into_repository_error(self.client.timeout()))
    }
}
