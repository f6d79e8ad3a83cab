//! Error types for petrol-cache.

use thiserror::Error;

use crate::state::CacheState;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors that can occur while installing or serving cached assets.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The operation is not allowed in the current lifecycle state.
    #[error("Cannot {operation} while cache is {state}")]
    InvalidState {
        state: CacheState,
        operation: &'static str,
    },

    /// The network request for an asset failed.
    #[error("Failed to fetch {path}: {message}")]
    Fetch { path: String, message: String },

    /// An asset answered with a non-success status during install.
    #[error("Asset {path} returned status {status}")]
    BadStatus { path: String, status: u16 },

    /// The configured origin is not an http(s) URL.
    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl CacheError {
    /// Build a fetch error for `path`.
    pub fn fetch(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this is a network failure (as opposed to a state or config error).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::BadStatus { .. })
    }
}
