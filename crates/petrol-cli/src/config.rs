//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use petrol_store::DEFAULT_HISTORY_LIMIT;

use crate::cli::{ConfigKey, OutputFormat};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "PETROL_CONFIG";

/// Largest accepted recent-history limit.
pub const MAX_HISTORY_LIMIT: u32 = 1000;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database file path
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Rows in the recent-history view
    #[serde(default)]
    pub history_limit: Option<u32>,

    /// Default output format
    #[serde(default)]
    pub format: Option<String>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("petrol")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Set one key from its command-line text.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        match key {
            ConfigKey::Database => {
                if value.trim().is_empty() {
                    bail!("database path cannot be empty");
                }
                self.database = Some(PathBuf::from(value));
            }
            ConfigKey::HistoryLimit => {
                let limit: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid history limit: {}", value))?;
                if limit == 0 || limit > MAX_HISTORY_LIMIT {
                    bail!("history limit must be between 1 and {}", MAX_HISTORY_LIMIT);
                }
                self.history_limit = Some(limit);
            }
            ConfigKey::Format => {
                if OutputFormat::from_config(value).is_none() {
                    bail!("Invalid format: {}. Use text, json or csv", value);
                }
                self.format = Some(value.to_lowercase());
            }
            ConfigKey::NoColor => {
                self.no_color = value
                    .parse()
                    .with_context(|| format!("Invalid boolean: {}. Use true or false", value))?;
            }
        }
        Ok(())
    }

    /// Reset one key to its default.
    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Database => self.database = None,
            ConfigKey::HistoryLimit => self.history_limit = None,
            ConfigKey::Format => self.format = None,
            ConfigKey::NoColor => self.no_color = false,
        }
    }

    /// Configured output format, if valid.
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.format.as_deref().and_then(OutputFormat::from_config)
    }

    /// Recent-history limit, falling back to the default.
    pub fn history_limit(&self) -> u32 {
        self.history_limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

/// Resolve the database path from the flag, then config, then the platform default.
pub fn resolve_database(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.or_else(|| config.database.clone())
        .unwrap_or_else(petrol_store::default_db_path)
}

/// Resolve the output format from the flag, then config, then text.
pub fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or_else(|| config.output_format()).unwrap_or_default()
}
