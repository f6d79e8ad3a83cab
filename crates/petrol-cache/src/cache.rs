//! The cache-first asset cache.

use std::collections::HashMap;

use futures::future::try_join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::fetcher::{AssetResponse, Fetcher};
use crate::state::CacheState;

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Network,
}

/// A response returned by [`AssetCache::respond`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub source: Source,
    pub response: AssetResponse,
}

/// Point-in-time view of a cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub name: String,
    pub state: CacheState,
    /// Cached request paths, sorted.
    pub paths: Vec<String>,
}

/// Cache-first store for a fixed list of assets.
///
/// The bucket is filled once by [`install`](Self::install) and never
/// invalidated per entry. Responses fetched at request time are returned but
/// not stored.
pub struct AssetCache<F> {
    config: CacheConfig,
    fetcher: F,
    state: RwLock<CacheState>,
    bucket: RwLock<HashMap<String, AssetResponse>>,
}

impl<F: Fetcher> AssetCache<F> {
    /// Create an uninstalled cache.
    pub fn new(config: CacheConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            state: RwLock::new(CacheState::Uninstalled),
            bucket: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub async fn state(&self) -> CacheState {
        *self.state.read().await
    }

    /// Fetch every configured asset and activate the cache.
    ///
    /// All assets are fetched concurrently. The bucket is only filled if every
    /// fetch returns a success status; otherwise the cache becomes
    /// [`CacheState::Redundant`] with an empty bucket and the first error is
    /// returned. Returns the number of cached assets.
    pub async fn install(&self) -> Result<usize> {
        {
            let mut state = self.state.write().await;
            if !state.can_install() {
                return Err(CacheError::InvalidState {
                    state: *state,
                    operation: "install",
                });
            }
            *state = CacheState::Installing;
        }

        info!("Installing cache {}", self.config.name);

        let fetches = self.config.assets.iter().map(|path| async move {
            let response = self.fetcher.fetch(path).await?;
            if !response.is_success() {
                return Err(CacheError::BadStatus {
                    path: path.clone(),
                    status: response.status,
                });
            }
            Ok::<_, CacheError>((path.clone(), response))
        });

        match try_join_all(fetches).await {
            Ok(assets) => {
                let count = assets.len();
                *self.bucket.write().await = assets.into_iter().collect();
                *self.state.write().await = CacheState::Active;
                info!("Opened cache {} ({} assets)", self.config.name, count);
                Ok(count)
            }
            Err(e) => {
                self.bucket.write().await.clear();
                *self.state.write().await = CacheState::Redundant;
                error!("Failed to install cache {}: {}", self.config.name, e);
                Err(e)
            }
        }
    }

    /// Serve `path` cache-first.
    ///
    /// When active and the path is cached, the fetcher is not touched.
    /// Otherwise exactly one network fetch is made and its result returned
    /// as-is.
    pub async fn respond(&self, path: &str) -> Result<CachedResponse> {
        if self.state().await.is_active() {
            if let Some(response) = self.bucket.read().await.get(path) {
                debug!("Cache hit for {}", path);
                return Ok(CachedResponse {
                    source: Source::Cache,
                    response: response.clone(),
                });
            }
        }

        debug!("Cache miss for {}, fetching from network", path);
        let response = self.fetcher.fetch(path).await?;
        Ok(CachedResponse {
            source: Source::Network,
            response,
        })
    }

    /// Whether `path` is in the bucket.
    pub async fn contains(&self, path: &str) -> bool {
        self.bucket.read().await.contains_key(path)
    }

    /// Cached request paths, sorted.
    pub async fn cached_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.bucket.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub async fn status(&self) -> CacheStatus {
        CacheStatus {
            name: self.config.name.clone(),
            state: self.state().await,
            paths: self.cached_paths().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ASSETS;
    use crate::mock::MockFetcher;

    fn cache() -> AssetCache<MockFetcher> {
        AssetCache::new(CacheConfig::default(), MockFetcher::serving(DEFAULT_ASSETS))
    }

    #[tokio::test]
    async fn test_new_cache_is_uninstalled() {
        let cache = cache();
        assert_eq!(cache.state().await, CacheState::Uninstalled);
        assert!(cache.cached_paths().await.is_empty());
        assert_eq!(cache.name(), "petrol-calc-cache-v1");
    }

    #[tokio::test]
    async fn test_install_caches_every_asset() {
        let cache = cache();
        assert_eq!(cache.install().await.unwrap(), 5);
        assert_eq!(cache.state().await, CacheState::Active);

        for path in DEFAULT_ASSETS {
            assert!(cache.contains(path).await);
            assert_eq!(cache.fetcher().calls(path).await, 1);
        }
    }

    #[tokio::test]
    async fn test_cache_hit_does_not_fetch() {
        let cache = cache();
        cache.install().await.unwrap();
        cache.fetcher().reset_calls().await;

        let served = cache.respond("/main.js").await.unwrap();
        assert_eq!(served.source, Source::Cache);
        assert_eq!(served.response.body.as_ref(), b"asset /main.js");
        assert_eq!(cache.fetcher().total_calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_survives_network_outage() {
        let cache = cache();
        cache.install().await.unwrap();
        cache.fetcher().set_should_fail(true);

        let served = cache.respond("/index.html").await.unwrap();
        assert_eq!(served.source, Source::Cache);
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_exactly_once() {
        let cache = AssetCache::new(
            CacheConfig::default(),
            MockFetcher::serving(DEFAULT_ASSETS).with_asset("/icon.png", "image/png", "png"),
        );
        cache.install().await.unwrap();

        let served = cache.respond("/icon.png").await.unwrap();
        assert_eq!(served.source, Source::Network);
        assert_eq!(cache.fetcher().calls("/icon.png").await, 1);

        // Network responses are not added to the bucket.
        assert!(!cache.contains("/icon.png").await);
        cache.respond("/icon.png").await.unwrap();
        assert_eq!(cache.fetcher().calls("/icon.png").await, 2);
    }

    #[tokio::test]
    async fn test_query_string_is_part_of_identity() {
        let cache = cache();
        cache.install().await.unwrap();

        let served = cache.respond("/main.js?v=2").await.unwrap();
        assert_eq!(served.source, Source::Network);
        assert_eq!(served.response.status, 404);
    }

    #[tokio::test]
    async fn test_respond_before_install_uses_network() {
        let cache = cache();
        let served = cache.respond("/").await.unwrap();
        assert_eq!(served.source, Source::Network);
        assert_eq!(cache.fetcher().calls("/").await, 1);
    }

    #[tokio::test]
    async fn test_network_failure_on_miss_propagates() {
        let cache = cache();
        cache.install().await.unwrap();
        cache.fetcher().set_should_fail(true);

        let err = cache.respond("/other").await.unwrap_err();
        assert!(matches!(err, CacheError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_failed_install_is_redundant_and_empty() {
        let cache = cache();
        cache.fetcher().fail_path("/style.css").await;

        let err = cache.install().await.unwrap_err();
        assert!(matches!(err, CacheError::Fetch { ref path, .. } if path == "/style.css"));
        assert_eq!(cache.state().await, CacheState::Redundant);
        assert!(cache.cached_paths().await.is_empty());

        // Nothing is served from the failed version.
        let served = cache.respond("/index.html").await.unwrap();
        assert_eq!(served.source, Source::Network);
    }

    #[tokio::test]
    async fn test_install_rejects_missing_asset() {
        let cache = AssetCache::new(
            CacheConfig::default(),
            MockFetcher::serving(["/", "/index.html", "/main.js", "/style.css"]),
        );

        let err = cache.install().await.unwrap_err();
        assert!(matches!(err, CacheError::BadStatus { status: 404, .. }));
        assert_eq!(cache.state().await, CacheState::Redundant);
        assert!(cache.cached_paths().await.is_empty());
    }

    #[tokio::test]
    async fn test_redundant_cache_can_reinstall() {
        let cache = cache();
        cache.fetcher().set_should_fail(true);
        assert!(cache.install().await.is_err());

        cache.fetcher().set_should_fail(false);
        cache.install().await.unwrap();
        assert_eq!(cache.state().await, CacheState::Active);
    }

    #[tokio::test]
    async fn test_install_twice_is_invalid() {
        let cache = cache();
        cache.install().await.unwrap();

        let err = cache.install().await.unwrap_err();
        assert!(matches!(
            err,
            CacheError::InvalidState {
                state: CacheState::Active,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_status_snapshot() {
        let cache = cache();
        cache.install().await.unwrap();

        let status = cache.status().await;
        assert_eq!(status.state, CacheState::Active);
        assert_eq!(
            status.paths,
            vec!["/", "/index.html", "/main.js", "/manifest.json", "/style.css"]
        );
    }
}
