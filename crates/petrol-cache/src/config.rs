//! Cache configuration.

use std::time::Duration;

/// Name of the current cache version.
pub const DEFAULT_CACHE_NAME: &str = "petrol-calc-cache-v1";

/// Assets fetched at install time.
pub const DEFAULT_ASSETS: &[&str] = &["/", "/index.html", "/main.js", "/style.css", "/manifest.json"];

/// Default network timeout for asset fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which assets a cache version holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Version identifier of the bucket.
    pub name: String,
    /// Request paths (including any query) to cache.
    pub assets: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CACHE_NAME.to_string(),
            assets: DEFAULT_ASSETS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl CacheConfig {
    pub fn new(name: impl Into<String>, assets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            assets: assets.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_assets() {
        let config = CacheConfig::default();
        assert_eq!(config.name, "petrol-calc-cache-v1");
        assert_eq!(
            config.assets,
            vec!["/", "/index.html", "/main.js", "/style.css", "/manifest.json"]
        );
    }

    #[test]
    fn test_new() {
        let config = CacheConfig::new("v2", ["/a.js", "/b.css"]);
        assert_eq!(config.name, "v2");
        assert_eq!(config.assets.len(), 2);
    }
}
