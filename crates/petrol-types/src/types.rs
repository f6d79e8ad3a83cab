//! Core types for fuel entries and history rows.

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calc::Calculation;

/// Calendar date format used for entries (`YYYY-MM-DD`).
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

// Serde helpers for `YYYY-MM-DD` dates; `iso_date::option` handles `Option<Date>`.
#[cfg(feature = "serde")]
time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Format a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, DATE_FORMAT)
}

/// Validated calculator input.
///
/// Only [`CalculatorForm::parse`](crate::CalculatorForm::parse) produces this,
/// so every numeric field is finite and greater than zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FuelInput {
    /// Trip distance in kilometers.
    pub mileage: f64,
    /// Fuel grade label.
    pub fuel_type: String,
    /// Price per liter.
    pub liters_price: f64,
    /// Total amount paid at the pump.
    pub pump_amount: f64,
    /// Days covered by the fill-up.
    pub duration_days: u32,
}

/// An entry ready to be inserted. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFuelEntry {
    pub date: Date,
    pub mileage_reading: f64,
    pub fuel_type: String,
    pub liters_price: f64,
    pub pump_amount: f64,
    pub duration_days: u32,
    pub km_per_rm: f64,
    pub km_per_rm_display: String,
}

impl NewFuelEntry {
    /// Build an entry from validated input and its computed efficiency.
    pub fn new(input: &FuelInput, calculation: &Calculation, date: Date) -> Self {
        Self {
            date,
            mileage_reading: input.mileage,
            fuel_type: input.fuel_type.clone(),
            liters_price: input.liters_price,
            pump_amount: input.pump_amount,
            duration_days: input.duration_days,
            km_per_rm: calculation.km_per_rm,
            km_per_rm_display: calculation.km_per_rm_display(),
        }
    }
}

/// A persisted fuel calculation.
///
/// Entries are immutable once stored: the store only inserts and bulk-clears.
/// Both the raw efficiency and its two-decimal display text are kept; history
/// views render the text so old rows never change appearance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FuelEntry {
    /// Store-assigned identifier, strictly increasing.
    pub id: i64,
    /// UTC date the entry was created.
    #[cfg_attr(feature = "serde", serde(with = "iso_date"))]
    pub date: Date,
    /// Distance traveled in kilometers.
    pub mileage_reading: f64,
    /// Fuel grade label.
    pub fuel_type: String,
    /// Price per liter.
    pub liters_price: f64,
    /// Total amount paid at the pump.
    pub pump_amount: f64,
    /// Days covered by the fill-up.
    pub duration_days: u32,
    /// Kilometers per currency unit.
    #[cfg_attr(feature = "serde", serde(rename = "kmPerRM"))]
    pub km_per_rm: f64,
    /// `km_per_rm` formatted to two decimals.
    #[cfg_attr(feature = "serde", serde(rename = "kmPerRMDisplay"))]
    pub km_per_rm_display: String,
}

impl FuelEntry {
    /// Attach a store-assigned id to a new entry.
    pub fn from_new(id: i64, entry: NewFuelEntry) -> Self {
        Self {
            id,
            date: entry.date,
            mileage_reading: entry.mileage_reading,
            fuel_type: entry.fuel_type,
            liters_price: entry.liters_price,
            pump_amount: entry.pump_amount,
            duration_days: entry.duration_days,
            km_per_rm: entry.km_per_rm,
            km_per_rm_display: entry.km_per_rm_display,
        }
    }

    /// The row shown in history tables.
    pub fn to_row(&self) -> HistoryRow {
        HistoryRow::from(self)
    }
}

/// One rendered history table row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HistoryRow {
    pub id: i64,
    pub date: String,
    pub fuel_type: String,
    /// Price per liter with currency prefix, e.g. `RM2.05`.
    pub liters_price: String,
    #[cfg_attr(feature = "serde", serde(rename = "kmPerRM"))]
    pub km_per_rm: String,
}

impl From<&FuelEntry> for HistoryRow {
    fn from(entry: &FuelEntry) -> Self {
        Self {
            id: entry.id,
            date: format_date(entry.date),
            fuel_type: entry.fuel_type.clone(),
            liters_price: format!("RM{}", entry.liters_price),
            km_per_rm: entry.km_per_rm_display.clone(),
        }
    }
}

/// One page of the full history view.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HistoryPage {
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
    /// Total entries across all pages.
    pub total: u64,
    pub rows: Vec<HistoryRow>,
}

impl HistoryPage {
    /// Number of pages needed for `total` entries.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        if self.per_page == 0 {
            0
        } else {
            self.total.div_ceil(u64::from(self.per_page))
        }
    }
}
