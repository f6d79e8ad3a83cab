//! Server configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use petrol_cache::{CacheConfig, DEFAULT_ASSETS, DEFAULT_CACHE_NAME};
use petrol_store::DEFAULT_HISTORY_LIMIT;

/// Largest accepted recent-history limit.
pub const MAX_HISTORY_LIMIT: u32 = 1000;

/// Server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server settings.
    pub server: ServerConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Recent-history view settings.
    pub history: HistoryConfig,
    /// Offline asset cache settings.
    pub assets: AssetsConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Server bind address is valid (host:port format)
    /// - Storage path is not empty
    /// - History limit is within 1..=1000
    /// - Asset origin is an http(s) URL, asset paths start with `/` and are unique
    ///
    /// # Example
    ///
    /// ```
    /// use petrol_service::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        errors.extend(self.server.validate());
        errors.extend(self.storage.validate());
        errors.extend(self.history.validate());
        errors.extend(self.assets.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl ServerConfig {
    /// Validate server configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.bind.is_empty() {
            errors.push(ValidationError::new(
                "server.bind",
                "bind address cannot be empty",
            ));
            return errors;
        }

        match self.bind.rsplit_once(':') {
            None => errors.push(ValidationError::new(
                "server.bind",
                format!(
                    "invalid bind address '{}': expected format 'host:port'",
                    self.bind
                ),
            )),
            Some((_, port)) => match port.parse::<u16>() {
                Ok(0) => errors.push(ValidationError::new("server.bind", "port cannot be 0")),
                Err(_) => errors.push(ValidationError::new(
                    "server.bind",
                    format!("invalid port '{}': must be a number 1-65535", port),
                )),
                Ok(_) => {}
            },
        }

        errors
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: petrol_store::default_db_path(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.path.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "storage.path",
                "database path cannot be empty",
            ));
        }

        errors
    }
}

/// Recent-history view configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of rows in the recent-history view.
    pub limit: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl HistoryConfig {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.limit == 0 || self.limit > MAX_HISTORY_LIMIT {
            errors.push(ValidationError::new(
                "history.limit",
                format!(
                    "history limit {} is out of range (1-{})",
                    self.limit, MAX_HISTORY_LIMIT
                ),
            ));
        }

        errors
    }
}

/// Offline asset cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Where assets are fetched from.
    pub origin: String,
    /// Cache version name.
    pub cache_name: String,
    /// Asset paths cached at startup.
    pub paths: Vec<String>,
    /// Network timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:8000".to_string(),
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            paths: DEFAULT_ASSETS.iter().map(|s| (*s).to_string()).collect(),
            timeout_secs: 30,
        }
    }
}

impl AssetsConfig {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !self.origin.starts_with("http://") && !self.origin.starts_with("https://") {
            errors.push(ValidationError::new(
                "assets.origin",
                format!(
                    "origin '{}' must start with http:// or https://",
                    self.origin
                ),
            ));
        }

        if self.cache_name.trim().is_empty() {
            errors.push(ValidationError::new(
                "assets.cache_name",
                "cache name cannot be empty",
            ));
        }

        if self.timeout_secs == 0 {
            errors.push(ValidationError::new(
                "assets.timeout_secs",
                "timeout must be at least 1 second",
            ));
        }

        let mut seen = HashSet::new();
        for (i, path) in self.paths.iter().enumerate() {
            let field = format!("assets.paths[{}]", i);
            if !path.starts_with('/') {
                errors.push(ValidationError::new(
                    field.clone(),
                    format!("asset path '{}' must start with '/'", path),
                ));
            }
            if !seen.insert(path.as_str()) {
                errors.push(ValidationError::new(
                    field,
                    format!("duplicate asset path '{}'", path),
                ));
            }
        }

        errors
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The cache layout these settings describe.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(self.cache_name.clone(), self.paths.iter().cloned())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `server.bind` or `assets.paths[0]`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("petrol")
        .join("server.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_fields(config: &Config) -> Vec<String> {
        match config.validate() {
            Err(ConfigError::Validation(errors)) => errors.into_iter().map(|e| e.field).collect(),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(()) => Vec::new(),
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.storage.path, petrol_store::default_db_path());
        assert_eq!(config.history.limit, 10);
        assert_eq!(config.assets.cache_name, "petrol-calc-cache-v1");
        assert_eq!(config.assets.paths.len(), 5);
        assert_eq!(config.assets.timeout(), Duration::from_secs(30));
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [server]
            bind = "0.0.0.0:9090"

            [history]
            limit = 20
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9090");
        assert_eq!(config.history.limit, 20);
        assert_eq!(config.assets.paths.len(), 5);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("server.toml");

        let config = Config {
            server: ServerConfig {
                bind: "0.0.0.0:9090".to_string(),
            },
            storage: StorageConfig {
                path: PathBuf::from("/tmp/petrol-test.db"),
            },
            history: HistoryConfig { limit: 15 },
            assets: AssetsConfig {
                paths: vec!["/".to_string(), "/app.js".to_string()],
                ..Default::default()
            },
        };

        config.save(&config_path).unwrap();
        let loaded = Config::load_validated(&config_path).unwrap();

        assert_eq!(loaded.server.bind, "0.0.0.0:9090");
        assert_eq!(loaded.storage.path, PathBuf::from("/tmp/petrol-test.db"));
        assert_eq!(loaded.history.limit, 15);
        assert_eq!(loaded.assets.paths, vec!["/", "/app.js"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/petrol/server.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("server.toml");
        std::fs::write(&path, "[server\nbind = ").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validate_bind_address() {
        for bind in ["", "localhost", "127.0.0.1:0", "127.0.0.1:http"] {
            let mut config = Config::default();
            config.server.bind = bind.to_string();
            assert_eq!(validation_fields(&config), vec!["server.bind"], "bind {:?}", bind);
        }
    }

    #[test]
    fn test_validate_storage_path() {
        let mut config = Config::default();
        config.storage.path = PathBuf::new();
        assert_eq!(validation_fields(&config), vec!["storage.path"]);
    }

    #[test]
    fn test_validate_history_limit() {
        let mut config = Config::default();
        config.history.limit = 0;
        assert_eq!(validation_fields(&config), vec!["history.limit"]);

        config.history.limit = 1001;
        assert_eq!(validation_fields(&config), vec!["history.limit"]);

        config.history.limit = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_assets() {
        let mut config = Config::default();
        config.assets.origin = "file:///srv/www".to_string();
        config.assets.paths = vec![
            "/".to_string(),
            "main.js".to_string(),
            "/".to_string(),
        ];

        assert_eq!(
            validation_fields(&config),
            vec!["assets.origin", "assets.paths[1]", "assets.paths[2]"]
        );
    }

    #[test]
    fn test_validation_error_message_lists_every_problem() {
        let mut config = Config::default();
        config.server.bind = "nope".to_string();
        config.history.limit = 0;

        let message = config.validate().unwrap_err().to_string();
        assert!(message.starts_with("Configuration validation failed:"));
        assert!(message.contains("  - server.bind:"));
        assert!(message.contains("  - history.limit:"));
    }

    #[test]
    fn test_cache_config_from_assets() {
        let config = AssetsConfig::default().cache_config();
        assert_eq!(config, CacheConfig::default());
    }
}
