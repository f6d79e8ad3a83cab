//! Mock fetcher for testing.
//!
//! [`MockFetcher`] serves canned responses without any network access and
//! counts how often each path was requested, so tests can tell cache hits
//! from network fetches.
//!
//! # Features
//!
//! - **Call counting**: per path and in total
//! - **Failure injection**: fail every fetch, or only specific paths
//! - **Missing assets**: unknown paths answer `404 Not Found`

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::error::{CacheError, Result};
use crate::fetcher::{AssetResponse, Fetcher};

/// A fetcher backed by an in-memory table of responses.
///
/// # Example
///
/// ```
/// use petrol_cache::{Fetcher, MockFetcher};
///
/// #[tokio::main]
/// async fn main() {
///     let fetcher = MockFetcher::new().with_asset("/main.js", "text/javascript", "main()");
///
///     let response = fetcher.fetch("/main.js").await.unwrap();
///     assert_eq!(response.body.as_ref(), b"main()");
///     assert_eq!(fetcher.calls("/main.js").await, 1);
/// }
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, AssetResponse>,
    calls: RwLock<HashMap<String, u32>>,
    total_calls: AtomicU32,
    should_fail: AtomicBool,
    failing_paths: RwLock<HashSet<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetcher that serves a small body for each of `paths`.
    pub fn serving<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths.into_iter().fold(Self::new(), |fetcher, path| {
            let path = path.as_ref();
            let body = format!("asset {}", path);
            fetcher.with_asset(path, content_type_for(path), body)
        })
    }

    /// Add a `200 OK` response for `path`.
    pub fn with_asset(self, path: &str, content_type: &str, body: impl Into<Bytes>) -> Self {
        self.with_response(path, AssetResponse::ok(content_type, body))
    }

    /// Add an arbitrary response for `path`.
    pub fn with_response(mut self, path: &str, response: AssetResponse) -> Self {
        self.responses.insert(path.to_string(), response);
        self
    }

    /// Make every fetch fail (or succeed again).
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    /// Make fetches of `path` fail.
    pub async fn fail_path(&self, path: &str) {
        self.failing_paths.write().await.insert(path.to_string());
    }

    /// Stop failing fetches of `path`.
    pub async fn restore_path(&self, path: &str) {
        self.failing_paths.write().await.remove(path);
    }

    /// Number of fetches made for `path`.
    pub async fn calls(&self, path: &str) -> u32 {
        self.calls.read().await.get(path).copied().unwrap_or(0)
    }

    /// Number of fetches made for any path.
    pub fn total_calls(&self) -> u32 {
        self.total_calls.load(Ordering::Relaxed)
    }

    /// Forget all recorded calls.
    pub async fn reset_calls(&self) {
        self.calls.write().await.clear();
        self.total_calls.store(0, Ordering::Relaxed);
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, path: &str) -> Result<AssetResponse> {
        *self.calls.write().await.entry(path.to_string()).or_insert(0) += 1;
        self.total_calls.fetch_add(1, Ordering::Relaxed);

        if self.should_fail.load(Ordering::Relaxed)
            || self.failing_paths.read().await.contains(path)
        {
            return Err(CacheError::fetch(path, "mock network failure"));
        }

        Ok(self
            .responses
            .get(path)
            .cloned()
            .unwrap_or_else(|| AssetResponse::new(404, Some("text/plain"), "Not Found")))
    }
}

fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        _ => "text/html",
    }
}
