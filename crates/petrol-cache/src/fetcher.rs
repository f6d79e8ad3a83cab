//! Network access for the asset cache.
//!
//! The [`Fetcher`] trait abstracts over the real HTTP client and the
//! [`MockFetcher`](crate::MockFetcher) used in tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::{CacheError, Result};

/// A fetched (or cached) asset response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl AssetResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// A `200 OK` response.
    pub fn ok(content_type: &str, body: impl Into<Bytes>) -> Self {
        Self::new(200, Some(content_type), body)
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can fetch an asset by request path.
///
/// # Example
///
/// ```ignore
/// use petrol_cache::{Fetcher, Result};
///
/// async fn size_of<F: Fetcher>(fetcher: &F, path: &str) -> Result<usize> {
///     Ok(fetcher.fetch(path).await?.body.len())
/// }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `path` (including any query string) from the network.
    ///
    /// Non-success statuses are returned as responses, not errors. Only a
    /// failure to get any response is a [`CacheError::Fetch`].
    async fn fetch(&self, path: &str) -> Result<AssetResponse>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, path: &str) -> Result<AssetResponse> {
        (**self).fetch(path).await
    }
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    async fn fetch(&self, path: &str) -> Result<AssetResponse> {
        (**self).fetch(path).await
    }
}

/// Fetches assets from an HTTP origin.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: String,
}

impl HttpFetcher {
    /// Create a fetcher for `origin` (e.g. `http://127.0.0.1:3000`).
    pub fn new(origin: &str, timeout: Duration) -> Result<Self> {
        let origin = origin.trim_end_matches('/').to_string();

        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(CacheError::InvalidOrigin(format!(
                "origin must start with http:// or https://, got: {}",
                origin
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, origin })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Full URL for a request path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}/{}", self.origin, path)
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<AssetResponse> {
        let url = self.url(path);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::fetch(path, e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::fetch(path, e.to_string()))?;

        Ok(AssetResponse {
            status,
            content_type,
            body,
        })
    }
}
