//! Local persistence for petrol calculator history.
//!
//! This crate keeps one SQLite row per submitted calculation and exposes the
//! calculator workflow on top of it.
//!
//! # Features
//!
//! - [`Store`]: synchronous SQLite access (insert, query, clear, statistics)
//! - [`Ledger`]: async calculator ledger with a one-shot ready gate
//! - [`EntryQuery`]: date range and pagination filters
//!
//! # Example
//!
//! ```no_run
//! use petrol_store::{Store, EntryQuery};
//!
//! let store = Store::open_default()?;
//!
//! // The ten most recent entries
//! let entries = store.query_entries(&EntryQuery::new().limit(10))?;
//! # Ok::<(), petrol_store::Error>(())
//! ```

mod error;
mod ledger;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, LedgerError, Result};
pub use ledger::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_PAGE_SIZE, Ledger, Location, MAX_PAGE_SIZE, RESET_PROMPT,
    ResetOutcome, Submission,
};
pub use models::HistoryStats;
pub use queries::EntryQuery;
pub use schema::SCHEMA_VERSION;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/petrol/data.db`
/// - macOS: `~/Library/Application Support/petrol/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\petrol\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("petrol")
        .join("data.db")
}
