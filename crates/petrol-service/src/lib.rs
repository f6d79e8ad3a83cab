//! HTTP API and offline asset server for the petrol calculator.
//!
//! This crate provides a service that:
//! - Accepts calculator form submissions and records them in the local ledger
//! - Serves the recent and full history, statistics and reset
//! - Serves the calculator page's static assets cache-first
//!
//! # REST API Endpoints
//!
//! - `GET /api/health` - Service health check
//! - `POST /api/calculations` - Submit the calculator form
//! - `GET /api/history` - Recent history (default 10 rows)
//! - `GET /api/history/all?page=&per_page=` - Full history, paginated
//! - `GET /api/history/stats` - Aggregate statistics
//! - `DELETE /api/history?confirm=true` - Clear all history
//! - `GET /api/cache` - Asset cache status
//! - `GET /*` - Static assets through the offline cache
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/petrol/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [storage]
//! path = "~/.local/share/petrol/data.db"
//!
//! [history]
//! limit = 10
//!
//! [assets]
//! origin = "http://127.0.0.1:8000"
//! cache_name = "petrol-calc-cache-v1"
//! paths = ["/", "/index.html", "/main.js", "/style.css", "/manifest.json"]
//! timeout_secs = 30
//! ```

pub mod api;
pub mod config;
pub mod state;

pub use config::{
    AssetsConfig, Config, ConfigError, HistoryConfig, ServerConfig, StorageConfig,
    ValidationError,
};
pub use state::{AppState, SharedFetcher};
