//! The calculator ledger: a store behind a one-shot ready gate.
//!
//! [`Ledger::new`] does no I/O. The first operation (or an explicit
//! [`Ledger::ready`]) opens the database on a blocking thread and creates the
//! schema if needed. If opening fails the gate stays closed and the next
//! operation tries again.
//!
//! ```
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use petrol_store::Ledger;
//! use petrol_types::CalculatorForm;
//!
//! let ledger = Ledger::in_memory();
//! let mut form = CalculatorForm::new("500", "RON95", "2.05", "100", "7");
//!
//! let submission = ledger.submit(&mut form).await?;
//! assert_eq!(submission.headline, "5.00 KM per RM");
//! assert!(form.is_empty());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, error, info};

use petrol_types::{
    Calculation, CalculatorForm, FuelEntry, FuelInput, HistoryPage, HistoryRow, NewFuelEntry,
    ValidationErrors,
};

use crate::error::LedgerError;
use crate::models::HistoryStats;
use crate::queries::EntryQuery;
use crate::store::Store;

/// Number of rows in the recent-history view.
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// Default page size for the full history view.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Largest page size accepted by [`Ledger::view_all`].
pub const MAX_PAGE_SIZE: u32 = 500;

/// Prompt surfaces show before a reset.
pub const RESET_PROMPT: &str = "Are you sure you want to reset all history? This cannot be undone.";

/// Where the ledger keeps its database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Memory,
}

/// Result of a submitted calculation.
///
/// The computed figures are always present. `entry` and `history` are `None`
/// when the entry could not be persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub input: FuelInput,
    pub calculation: Calculation,
    /// e.g. `5.00 KM per RM`
    pub headline: String,
    pub summary: String,
    pub entry: Option<FuelEntry>,
    /// Refreshed recent-history view, including `entry`.
    pub history: Option<Vec<HistoryRow>>,
}

impl Submission {
    /// Whether the entry reached the store.
    pub fn persisted(&self) -> bool {
        self.entry.is_some()
    }
}

/// Result of [`Ledger::reset_history`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ResetOutcome {
    /// The user did not confirm. Nothing changed.
    Declined,
    /// Every entry was deleted.
    Cleared {
        removed: usize,
        history: Vec<HistoryRow>,
    },
}

/// Calculator ledger over a lazily opened [`Store`].
pub struct Ledger {
    location: Location,
    history_limit: u32,
    store: OnceCell<Mutex<Store>>,
}

impl Ledger {
    /// Create a ledger backed by a database file. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_location(Location::File(path.into()))
    }

    /// Create a ledger backed by an in-memory database.
    pub fn in_memory() -> Self {
        Self::with_location(Location::Memory)
    }

    fn with_location(location: Location) -> Self {
        Self {
            location,
            history_limit: DEFAULT_HISTORY_LIMIT,
            store: OnceCell::new(),
        }
    }

    /// Set the number of rows in the recent-history view.
    pub fn with_history_limit(mut self, limit: u32) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Database file path, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    pub fn history_limit(&self) -> u32 {
        self.history_limit
    }

    /// Whether the database has been opened.
    pub fn is_ready(&self) -> bool {
        self.store.initialized()
    }

    /// Open the database if it is not open yet.
    pub async fn ready(&self) -> Result<&Mutex<Store>, LedgerError> {
        self.store
            .get_or_try_init(|| async {
                let location = self.location.clone();
                let opened = tokio::task::spawn_blocking(move || match location {
                    Location::File(path) => Store::open(path),
                    Location::Memory => Store::open_in_memory(),
                })
                .await;

                match opened {
                    Ok(Ok(store)) => Ok(Mutex::new(store)),
                    Ok(Err(e)) => {
                        error!("Error opening database: {}", e);
                        Err(LedgerError::Unavailable(e.to_string()))
                    }
                    Err(e) => {
                        error!("Database open task failed: {}", e);
                        Err(LedgerError::Unavailable(e.to_string()))
                    }
                }
            })
            .await
    }

    /// Validate the form, compute the result and record it.
    ///
    /// Validation errors leave the form untouched. Otherwise the form is reset
    /// whether or not the entry could be stored; storage failures are logged
    /// and show up as `entry: None`.
    pub async fn submit(&self, form: &mut CalculatorForm) -> Result<Submission, ValidationErrors> {
        let input = form.parse()?;
        let calculation = Calculation::compute(&input);
        let headline = calculation.headline();
        let summary = calculation.summary(&input);

        let new_entry = NewFuelEntry::new(&input, &calculation, OffsetDateTime::now_utc().date());
        let (entry, history) = match self.persist(&new_entry).await {
            Ok(persisted) => persisted,
            Err(e) => {
                error!("Error adding entry: {}", e);
                (None, None)
            }
        };

        form.reset();

        Ok(Submission {
            input,
            calculation,
            headline,
            summary,
            entry,
            history,
        })
    }

    // The lock is held across insert and reload so the refreshed view always
    // contains the new entry.
    async fn persist(
        &self,
        new_entry: &NewFuelEntry,
    ) -> Result<(Option<FuelEntry>, Option<Vec<HistoryRow>>), LedgerError> {
        let store = self.ready().await?.lock().await;
        let entry = store.insert_entry(new_entry)?;
        info!("Entry {} added", entry.id);

        let history = match store.recent_entries(self.history_limit) {
            Ok(entries) => Some(entries.iter().map(HistoryRow::from).collect()),
            Err(e) => {
                error!("Error loading history: {}", e);
                None
            }
        };

        Ok((Some(entry), history))
    }

    /// The recent-history view, newest first.
    ///
    /// Read failures are logged and yield an empty list.
    pub async fn load_history(&self) -> Vec<HistoryRow> {
        match self.recent().await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Error loading history: {}", e);
                Vec::new()
            }
        }
    }

    async fn recent(&self) -> Result<Vec<HistoryRow>, LedgerError> {
        let store = self.ready().await?.lock().await;
        let entries = store.recent_entries(self.history_limit)?;
        debug!("Loaded {} history rows", entries.len());
        Ok(entries.iter().map(HistoryRow::from).collect())
    }

    /// Delete every entry, but only when `confirmed`.
    pub async fn reset_history(&self, confirmed: bool) -> Result<ResetOutcome, LedgerError> {
        if !confirmed {
            return Ok(ResetOutcome::Declined);
        }

        let removed = {
            let store = self.ready().await?.lock().await;
            store.clear_entries()?
        };

        let history = self.load_history().await;
        Ok(ResetOutcome::Cleared { removed, history })
    }

    /// One page of the full history, newest first.
    ///
    /// `page` is 1-based (0 is treated as 1). `per_page` is clamped to
    /// `1..=MAX_PAGE_SIZE`.
    pub async fn view_all(&self, page: u32, per_page: u32) -> Result<HistoryPage, LedgerError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1).saturating_mul(per_page);

        let store = self.ready().await?.lock().await;
        let total = store.count_entries()?;
        let entries = store.query_entries(&EntryQuery::new().limit(per_page).offset(offset))?;

        Ok(HistoryPage {
            page,
            per_page,
            total,
            rows: entries.iter().map(HistoryRow::from).collect(),
        })
    }

    /// Aggregate statistics over every entry.
    pub async fn stats(&self) -> Result<HistoryStats, LedgerError> {
        let store = self.ready().await?.lock().await;
        Ok(store.stats()?)
    }

    /// Full entries matching `query`, for export.
    pub async fn entries(&self, query: &EntryQuery) -> Result<Vec<FuelEntry>, LedgerError> {
        let store = self.ready().await?.lock().await;
        Ok(store.query_entries(query)?)
    }

    /// Number of stored entries.
    pub async fn count(&self) -> Result<u64, LedgerError> {
        let store = self.ready().await?.lock().await;
        Ok(store.count_entries()?)
    }
}
