//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use petrol_cache::{AssetCache, Fetcher, HttpFetcher};
use petrol_store::Ledger;

use crate::config::Config;

/// Fetcher used by the service's asset cache.
pub type SharedFetcher = Arc<dyn Fetcher>;

/// Shared application state.
pub struct AppState {
    /// The calculator ledger. It opens its database on first use.
    pub ledger: Ledger,
    /// Offline asset cache behind the fallback route.
    pub cache: AssetCache<SharedFetcher>,
    /// Configuration (RwLock for runtime updates).
    pub config: RwLock<Config>,
}

impl AppState {
    /// Create new application state.
    pub fn new(ledger: Ledger, cache: AssetCache<SharedFetcher>, config: Config) -> Arc<Self> {
        Arc::new(Self {
            ledger,
            cache,
            config: RwLock::new(config),
        })
    }

    /// Build the ledger and an HTTP-backed asset cache from configuration.
    ///
    /// No I/O happens here: the database opens on first use and the cache
    /// stays uninstalled until [`AssetCache::install`] is called.
    pub fn from_config(config: Config) -> petrol_cache::Result<Arc<Self>> {
        let ledger =
            Ledger::new(config.storage.path.clone()).with_history_limit(config.history.limit);

        let fetcher = HttpFetcher::new(&config.assets.origin, config.assets.timeout())?;
        let cache = AssetCache::new(
            config.assets.cache_config(),
            Arc::new(fetcher) as SharedFetcher,
        );

        Ok(Self::new(ledger, cache, config))
    }
}
