//! Platform-agnostic types for the petrol calculator.
//!
//! This crate provides the data model shared by the store, the HTTP service
//! and the CLI.
//!
//! # Features
//!
//! - [`CalculatorForm`]: raw form input and its validation boundary
//! - [`Calculation`]: the efficiency computation and result text
//! - [`FuelEntry`] / [`NewFuelEntry`]: persisted history records
//! - [`HistoryRow`] / [`HistoryPage`]: rendered history views
//!
//! # Example
//!
//! ```
//! use petrol_types::{CalculatorForm, Calculation};
//!
//! let input = CalculatorForm::new("500", "RON95", "2.05", "100", "7").parse()?;
//! let calc = Calculation::compute(&input);
//! assert_eq!(calc.headline(), "5.00 KM per RM");
//! # Ok::<(), petrol_types::ValidationErrors>(())
//! ```

pub mod calc;
pub mod error;
pub mod form;
pub mod types;

pub use calc::{Calculation, to_fixed2};
pub use error::{ErrorKind, Field, ValidationError, ValidationErrors, ValidationResult};
pub use form::CalculatorForm;
pub use types::{
    DATE_FORMAT, FuelEntry, FuelInput, HistoryPage, HistoryRow, NewFuelEntry, format_date,
    parse_date,
};
