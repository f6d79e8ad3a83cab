//! Raw calculator form input and the validation boundary.
//!
//! [`CalculatorForm`] holds the five fields exactly as typed. Nothing reaches
//! the computation until [`CalculatorForm::parse`] has turned them into a
//! [`FuelInput`], so malformed text is reported as structured
//! [`ValidationErrors`] instead of flowing through as NaN.
//!
//! # Example
//!
//! ```
//! use petrol_types::{CalculatorForm, Field};
//!
//! let form = CalculatorForm::new("500", "RON95", "2.05", "100", "7");
//! let input = form.parse().unwrap();
//! assert_eq!(input.duration_days, 7);
//!
//! let bad = CalculatorForm::new("abc", "RON95", "0", "100", "7");
//! let errors = bad.parse().unwrap_err();
//! assert!(errors.has(Field::Mileage));
//! assert!(errors.has(Field::LitersPrice));
//! ```

use crate::error::{ErrorKind, Field, ValidationError, ValidationErrors, ValidationResult};
use crate::types::FuelInput;

/// The calculator form as submitted, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CalculatorForm {
    /// Trip distance in kilometers.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "loose::text"))]
    pub mileage: String,
    /// Fuel grade label (e.g. `RON95`).
    #[cfg_attr(
        feature = "serde",
        serde(alias = "pumpRon", deserialize_with = "loose::text")
    )]
    pub fuel_type: String,
    /// Price per liter.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "loose::text"))]
    pub liters_price: String,
    /// Total amount paid at the pump.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "loose::text"))]
    pub pump_amount: String,
    /// Days covered by the fill-up.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "loose::text"))]
    pub duration_days: String,
}

impl CalculatorForm {
    /// Build a form from raw field text.
    pub fn new(
        mileage: impl Into<String>,
        fuel_type: impl Into<String>,
        liters_price: impl Into<String>,
        pump_amount: impl Into<String>,
        duration_days: impl Into<String>,
    ) -> Self {
        Self {
            mileage: mileage.into(),
            fuel_type: fuel_type.into(),
            liters_price: liters_price.into(),
            pump_amount: pump_amount.into(),
            duration_days: duration_days.into(),
        }
    }

    /// Whether every field is blank.
    pub fn is_empty(&self) -> bool {
        [
            &self.mileage,
            &self.fuel_type,
            &self.liters_price,
            &self.pump_amount,
            &self.duration_days,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }

    /// Clear every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate all fields, collecting every error.
    pub fn parse(&self) -> ValidationResult<FuelInput> {
        let mut errors = Vec::new();

        let mileage = positive_real(Field::Mileage, &self.mileage, &mut errors);
        let fuel_type = label(Field::FuelType, &self.fuel_type, &mut errors);
        let liters_price = positive_real(Field::LitersPrice, &self.liters_price, &mut errors);
        let pump_amount = positive_real(Field::PumpAmount, &self.pump_amount, &mut errors);
        let duration_days = positive_integer(Field::DurationDays, &self.duration_days, &mut errors);

        match (mileage, fuel_type, liters_price, pump_amount, duration_days) {
            (Some(mileage), Some(fuel_type), Some(liters_price), Some(pump_amount), Some(days))
                if errors.is_empty() =>
            {
                Ok(FuelInput {
                    mileage,
                    fuel_type,
                    liters_price,
                    pump_amount,
                    duration_days: days,
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }
}

fn reject(errors: &mut Vec<ValidationError>, field: Field, kind: ErrorKind, raw: &str) {
    errors.push(ValidationError {
        field,
        kind,
        value: raw.to_string(),
    });
}

fn positive_real(field: Field, raw: &str, errors: &mut Vec<ValidationError>) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        reject(errors, field, ErrorKind::Missing, raw);
        return None;
    }

    let value = match text.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            reject(errors, field, ErrorKind::NotANumber, raw);
            return None;
        }
    };

    // "NaN" and "inf" parse successfully as f64.
    if !value.is_finite() {
        reject(errors, field, ErrorKind::NotFinite, raw);
        return None;
    }
    if value <= 0.0 {
        reject(errors, field, ErrorKind::NotPositive, raw);
        return None;
    }

    Some(value)
}

fn positive_integer(field: Field, raw: &str, errors: &mut Vec<ValidationError>) -> Option<u32> {
    let text = raw.trim();
    if text.is_empty() {
        reject(errors, field, ErrorKind::Missing, raw);
        return None;
    }

    let value = match text.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let kind = match text.parse::<f64>() {
                Ok(_) => ErrorKind::NotAnInteger,
                Err(_) => ErrorKind::NotANumber,
            };
            reject(errors, field, kind, raw);
            return None;
        }
    };

    if value <= 0 {
        reject(errors, field, ErrorKind::NotPositive, raw);
        return None;
    }

    match u32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            reject(errors, field, ErrorKind::OutOfRange, raw);
            None
        }
    }
}

fn label(field: Field, raw: &str, errors: &mut Vec<ValidationError>) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        reject(errors, field, ErrorKind::Missing, raw);
        None
    } else {
        Some(text.to_string())
    }
}

/// Lenient deserialization for form fields posted as JSON.
///
/// HTML forms and hand-written clients send numbers as strings, bare numbers
/// or null; all of them land in the form as text and are judged by `parse`.
#[cfg(feature = "serde")]
mod loose {
    use core::fmt;

    use serde::de::{self, Deserializer, Visitor};

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(TextVisitor)
    }

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }
}
