//! Error types for petrol-store.

use std::path::PathBuf;

/// Result type for petrol-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in petrol-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A stored date could not be parsed.
    #[error("Invalid date in entry {id}: {value}")]
    InvalidDate { id: i64, value: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by [`Ledger`](crate::Ledger) operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The store could not be opened; persistence and history are unavailable.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] Error),
}
