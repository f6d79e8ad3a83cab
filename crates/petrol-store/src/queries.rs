//! Query builder for stored entries.
//!
//! # Example
//!
//! ```
//! use petrol_store::{Store, EntryQuery};
//!
//! let store = Store::open_in_memory()?;
//!
//! // The ten most recently inserted entries
//! let recent = store.query_entries(&EntryQuery::new().limit(10))?;
//!
//! // Everything, oldest first, for export
//! let all = store.query_entries(&EntryQuery::new().oldest_first())?;
//! # Ok::<(), petrol_store::Error>(())
//! ```

use time::Date;

use petrol_types::format_date;

/// Fluent query builder for fuel entries.
///
/// Results are ordered by insertion (`id`), newest first by default. The
/// optional date range uses the `date` index.
#[derive(Debug, Default, Clone)]
pub struct EntryQuery {
    /// Include only entries dated on or after this day.
    pub since: Option<Date>,
    /// Include only entries dated on or before this day.
    pub until: Option<Date>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u32>,
    /// Order by id descending (most recently inserted first).
    pub newest_first: bool,
}

impl EntryQuery {
    /// Create a new query: no filters, no limit, newest first.
    pub fn new() -> Self {
        Self {
            newest_first: true,
            ..Default::default()
        }
    }

    /// Filter to entries dated on or after `date`.
    pub fn since(mut self, date: Date) -> Self {
        self.since = Some(date);
        self
    }

    /// Filter to entries dated on or before `date`.
    pub fn until(mut self, date: Date) -> Self {
        self.until = Some(date);
        self
    }

    /// Limit the number of results.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Order by insertion, oldest first.
    pub fn oldest_first(mut self) -> Self {
        self.newest_first = false;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        // ISO dates compare correctly as text.
        if let Some(since) = self.since {
            conditions.push("date >= ?");
            params.push(Box::new(format_date(since)));
        }

        if let Some(until) = self.until {
            conditions.push("date <= ?");
            params.push(Box::new(format_date(until)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT id, date, mileage_reading, fuel_type, liters_price, pump_amount, \
             duration_days, km_per_rm, km_per_rm_display \
             FROM entries {} ORDER BY id {}",
            where_clause, order
        );

        // SQLite requires LIMIT whenever OFFSET is present.
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset))
            }
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_entry_query_new_defaults() {
        let query = EntryQuery::new();
        assert!(query.since.is_none());
        assert!(query.until.is_none());
        assert!(query.limit.is_none());
        assert!(query.offset.is_none());
        assert!(query.newest_first);
    }

    #[test]
    fn test_default_is_oldest_first() {
        assert!(!EntryQuery::default().newest_first);
    }

    #[test]
    fn test_build_sql_orders_by_id() {
        let sql = EntryQuery::new().build_sql();
        assert!(sql.contains("ORDER BY id DESC"));
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("LIMIT"));

        let sql = EntryQuery::new().oldest_first().build_sql();
        assert!(sql.contains("ORDER BY id ASC"));
    }

    #[test]
    fn test_build_sql_with_limit_and_offset() {
        let sql = EntryQuery::new().limit(10).offset(20).build_sql();
        assert!(sql.ends_with("LIMIT 10 OFFSET 20"));
    }

    #[test]
    fn test_build_sql_offset_without_limit() {
        let sql = EntryQuery::new().offset(5).build_sql();
        assert!(sql.ends_with("LIMIT -1 OFFSET 5"));
    }

    #[test]
    fn test_build_where_date_range() {
        let query = EntryQuery::new()
            .since(date!(2024 - 01 - 01))
            .until(date!(2024 - 01 - 31));
        let (clause, params) = query.build_where();
        assert_eq!(clause, "WHERE date >= ? AND date <= ?");
        assert_eq!(params.len(), 2);
    }
}
