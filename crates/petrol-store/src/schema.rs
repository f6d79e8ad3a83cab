//! SQLite schema for the fuel ledger.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::Result;

/// Version written to `schema_version` by this build.
pub const SCHEMA_VERSION: i32 = 1;

/// Bring a connection's schema up to [`SCHEMA_VERSION`].
///
/// A fresh database gets its tables once; an older one is stamped with the
/// current version after any pending upgrades.
pub fn initialize(conn: &Connection) -> Result<()> {
    match stored_version(conn)? {
        None => {
            conn.execute_batch(TABLES)?;
            stamp(conn)?;
            info!("Database setup complete");
        }
        Some(found) if found < SCHEMA_VERSION => {
            info!("Upgrading database schema v{} -> v{}", found, SCHEMA_VERSION);
            stamp(conn)?;
        }
        Some(found) => debug!("Database schema v{}", found),
    }
    Ok(())
}

/// The recorded version, or `None` before the schema exists.
fn stored_version(conn: &Connection) -> Result<Option<i32>> {
    let has_table = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    if !has_table {
        return Ok(None);
    }

    Ok(conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?)
}

fn stamp(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_version (id, version) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET version = excluded.version",
        [SCHEMA_VERSION],
    )?;
    Ok(())
}

// AUTOINCREMENT keeps ids strictly increasing even after a clear.
const TABLES: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_version (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        version INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        mileage_reading REAL NOT NULL,
        fuel_type TEXT NOT NULL,
        liters_price REAL NOT NULL,
        pump_amount REAL NOT NULL,
        duration_days INTEGER NOT NULL,
        km_per_rm REAL NOT NULL,
        km_per_rm_display TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
"#;
