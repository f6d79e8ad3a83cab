//! Aggregate models computed from stored entries.

use serde::Serialize;
use time::Date;

use petrol_types::types::iso_date;

/// Aggregate statistics over every stored entry.
///
/// Computed from the raw numeric columns, so it does not depend on the
/// rounded display text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    /// Number of entries.
    pub count: u64,
    /// Sum of trip distances in kilometers.
    pub total_distance: f64,
    /// Sum of pump amounts.
    pub total_spent: f64,
    /// Mean of per-entry efficiency.
    #[serde(rename = "averageKmPerRM")]
    pub average_km_per_rm: Option<f64>,
    /// Overall efficiency: total distance over total spent.
    #[serde(rename = "overallKmPerRM")]
    pub overall_km_per_rm: Option<f64>,
    /// Earliest entry date.
    #[serde(with = "iso_date::option")]
    pub first_date: Option<Date>,
    /// Latest entry date.
    #[serde(with = "iso_date::option")]
    pub last_date: Option<Date>,
}
