//! Offline asset cache for the petrol calculator.
//!
//! A fixed list of assets is fetched once at install time. After that,
//! requests for those assets are answered from the cache without touching the
//! network; anything else goes to the network and is not cached.
//!
//! # Example
//!
//! ```
//! use petrol_cache::{AssetCache, CacheConfig, MockFetcher, Source, DEFAULT_ASSETS};
//!
//! # #[tokio::main]
//! # async fn main() -> petrol_cache::Result<()> {
//! let cache = AssetCache::new(CacheConfig::default(), MockFetcher::serving(DEFAULT_ASSETS));
//! cache.install().await?;
//!
//! let served = cache.respond("/index.html").await?;
//! assert_eq!(served.source, Source::Cache);
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod error;
mod fetcher;
pub mod mock;
mod state;

pub use cache::{AssetCache, CacheStatus, CachedResponse, Source};
pub use config::{CacheConfig, DEFAULT_ASSETS, DEFAULT_CACHE_NAME, DEFAULT_TIMEOUT};
pub use error::{CacheError, Result};
pub use fetcher::{AssetResponse, Fetcher, HttpFetcher};
pub use mock::MockFetcher;
pub use state::CacheState;
