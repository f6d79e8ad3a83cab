//! Validation errors for calculator form input.

use core::fmt;

use thiserror::Error;

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Field {
    /// Trip distance in kilometers.
    Mileage,
    /// Fuel grade label.
    FuelType,
    /// Price per liter.
    LitersPrice,
    /// Total amount paid at the pump.
    PumpAmount,
    /// Days covered by the fill-up.
    DurationDays,
}

impl Field {
    /// Human-readable field label used in error messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Field::Mileage => "mileage",
            Field::FuelType => "fuel type",
            Field::LitersPrice => "price per liter",
            Field::PumpAmount => "pump amount",
            Field::DurationDays => "duration in days",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a field was rejected.
///
/// This enum is marked `#[non_exhaustive]` so new checks can be added
/// without breaking downstream matches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum ErrorKind {
    /// The field was empty or whitespace.
    Missing,
    /// The field is not a number.
    NotANumber,
    /// The field parsed to NaN or infinity.
    NotFinite,
    /// The field must be an integer.
    NotAnInteger,
    /// The field must be greater than zero.
    NotPositive,
    /// The value does not fit the field's range.
    OutOfRange,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Missing => write!(f, "is required"),
            ErrorKind::NotANumber => write!(f, "must be a number"),
            ErrorKind::NotFinite => write!(f, "must be a finite number"),
            ErrorKind::NotAnInteger => write!(f, "must be a whole number"),
            ErrorKind::NotPositive => write!(f, "must be greater than zero"),
            ErrorKind::OutOfRange => write!(f, "is out of range"),
        }
    }
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{field} {kind} (got {value:?})")]
pub struct ValidationError {
    /// The field that failed.
    pub field: Field,
    /// What was wrong with it.
    pub kind: ErrorKind,
    /// The raw text that was submitted.
    pub value: String,
}

/// Every field error produced by one form submission.
///
/// Never empty when returned from [`CalculatorForm::parse`](crate::CalculatorForm::parse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid input: {}", join_errors(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// The individual field errors.
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Whether a given field was rejected.
    pub fn has(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// The error for a given field, if any.
    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.kind))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for form parsing.
pub type ValidationResult<T> = std::result::Result<T, ValidationErrors>;
