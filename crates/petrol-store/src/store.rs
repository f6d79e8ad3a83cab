//! Main store implementation.

use std::path::Path;

use rusqlite::Connection;
use time::OffsetDateTime;
use tracing::{debug, info};

use petrol_types::{FuelEntry, NewFuelEntry, format_date, parse_date};

use crate::error::{Error, Result};
use crate::models::HistoryStats;
use crate::queries::EntryQuery;
use crate::schema;

/// SQLite-based store for fuel entries.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL lets the CLI and the service share one database file.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }
}

// Entry operations
impl Store {
    /// Insert an entry and return it with its store-assigned id.
    pub fn insert_entry(&self, entry: &NewFuelEntry) -> Result<FuelEntry> {
        self.conn.execute(
            "INSERT INTO entries (date, mileage_reading, fuel_type, liters_price, pump_amount,
             duration_days, km_per_rm, km_per_rm_display, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                format_date(entry.date),
                entry.mileage_reading,
                entry.fuel_type,
                entry.liters_price,
                entry.pump_amount,
                entry.duration_days,
                entry.km_per_rm,
                entry.km_per_rm_display,
                OffsetDateTime::now_utc().unix_timestamp(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted entry {}", id);
        Ok(FuelEntry::from_new(id, entry.clone()))
    }

    /// Query entries with filters.
    pub fn query_entries(&self, query: &EntryQuery) -> Result<Vec<FuelEntry>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_ref.as_slice(), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    FuelEntryColumns {
                        mileage_reading: row.get(2)?,
                        fuel_type: row.get(3)?,
                        liters_price: row.get(4)?,
                        pump_amount: row.get(5)?,
                        duration_days: row.get(6)?,
                        km_per_rm: row.get(7)?,
                        km_per_rm_display: row.get(8)?,
                    },
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, date, cols)| {
                let date = parse_date(&date).map_err(|_| Error::InvalidDate {
                    id,
                    value: date.clone(),
                })?;
                Ok(FuelEntry {
                    id,
                    date,
                    mileage_reading: cols.mileage_reading,
                    fuel_type: cols.fuel_type,
                    liters_price: cols.liters_price,
                    pump_amount: cols.pump_amount,
                    duration_days: cols.duration_days,
                    km_per_rm: cols.km_per_rm,
                    km_per_rm_display: cols.km_per_rm_display,
                })
            })
            .collect()
    }

    /// The most recently inserted entries, newest first.
    pub fn recent_entries(&self, limit: u32) -> Result<Vec<FuelEntry>> {
        self.query_entries(&EntryQuery::new().limit(limit))
    }

    /// Count all entries.
    pub fn count_entries(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Delete every entry. Returns the number removed.
    ///
    /// The autoincrement sequence is left alone, so later ids keep growing.
    pub fn clear_entries(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM entries", [])?;
        info!("History cleared ({} entries removed)", removed);
        Ok(removed)
    }

    /// Aggregate statistics over all entries.
    pub fn stats(&self) -> Result<HistoryStats> {
        let (count, total_distance, total_spent, average, first, last) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(mileage_reading), 0), COALESCE(SUM(pump_amount), 0),
                    AVG(km_per_rm), MIN(date), MAX(date)
             FROM entries",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            },
        )?;

        let overall_km_per_rm = if total_spent > 0.0 {
            Some(total_distance / total_spent)
        } else {
            None
        };

        Ok(HistoryStats {
            count: count as u64,
            total_distance,
            total_spent,
            average_km_per_rm: average,
            overall_km_per_rm,
            first_date: first.as_deref().and_then(|d| parse_date(d).ok()),
            last_date: last.as_deref().and_then(|d| parse_date(d).ok()),
        })
    }
}

struct FuelEntryColumns {
    mileage_reading: f64,
    fuel_type: String,
    liters_price: f64,
    pump_amount: f64,
    duration_days: u32,
    km_per_rm: f64,
    km_per_rm_display: String,
}
