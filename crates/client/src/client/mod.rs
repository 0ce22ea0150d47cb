//! HTTP client for freshcache remote sources.

mod remote;

pub use remote::HttpRemoteSource;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, Result};

/// Default per-request deadline applied by the HTTP client itself.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for a freshcache-compatible remote.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new client whose requests fail after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Deadline applied to every request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON document.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        self.handle_response(path, response).await
    }

    /// GET a JSON document with query parameters.
    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        self.handle_response(path, response).await
    }

    /// PUT a JSON body, expecting no meaningful response body.
    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        self.handle_empty_response(path, response).await
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.client.delete(self.url(path)).send().await?;
        self.handle_empty_response(path, response).await
    }

    /// Handle error responses.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(ClientError::from)
        } else {
            Err(Self::error_for(path, status, response).await)
        }
    }

    /// Handle responses where no body is expected.
    async fn handle_empty_response(&self, path: &str, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_for(path, status, response).await)
        }
    }

    async fn error_for(
        path: &str,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ClientError {
        if status == reqwest::StatusCode::NOT_FOUND {
            return ClientError::NotFound {
                resource: path.trim_start_matches('/').to_string(),
            };
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        ClientError::ServerError {
            status: status.as_u16(),
            message,
        }
    }
}
