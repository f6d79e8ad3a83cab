//! Fuel efficiency computation and result text.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::FuelInput;

/// Format `value` with two decimals, rounding exact halves away from zero.
///
/// `{:.2}` alone rounds an exact tie such as `0.125` to even (`0.12`). Only odd
/// multiples of 1/8 are exact ties at two decimals; everything else goes
/// through `{:.2}` unchanged.
///
/// ```
/// use petrol_types::to_fixed2;
///
/// assert_eq!(to_fixed2(0.125), "0.13");
/// assert_eq!(to_fixed2(48.780487), "48.78");
/// ```
#[must_use]
pub fn to_fixed2(value: f64) -> String {
    // 12.5 * eighths stays exact below this bound.
    const EXACT_LIMIT: f64 = (1u64 << 49) as f64;

    let eighths = value.abs() * 8.0;
    let is_tie = eighths.fract() == 0.0 && eighths % 2.0 == 1.0 && eighths < EXACT_LIMIT;
    if !is_tie {
        return format!("{:.2}", value);
    }

    let cents = (value.abs() * 100.0).ceil() as u64;
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}

/// Result of one efficiency calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Calculation {
    /// Liters bought: `pump_amount / liters_price`.
    pub total_liters: f64,
    /// Kilometers per currency unit: `mileage / pump_amount`.
    #[cfg_attr(feature = "serde", serde(rename = "kmPerRM"))]
    pub km_per_rm: f64,
}

impl Calculation {
    /// Compute efficiency for validated input.
    ///
    /// # Example
    ///
    /// ```
    /// use petrol_types::{CalculatorForm, Calculation};
    ///
    /// let input = CalculatorForm::new("500", "RON95", "2.05", "100", "7").parse().unwrap();
    /// let calc = Calculation::compute(&input);
    /// assert_eq!(calc.km_per_rm_display(), "5.00");
    /// assert_eq!(petrol_types::to_fixed2(calc.total_liters), "48.78");
    /// ```
    #[must_use]
    pub fn compute(input: &FuelInput) -> Self {
        Self {
            total_liters: input.pump_amount / input.liters_price,
            km_per_rm: input.mileage / input.pump_amount,
        }
    }

    /// Efficiency rounded to two decimals, as stored and displayed in history.
    #[must_use]
    pub fn km_per_rm_display(&self) -> String {
        to_fixed2(self.km_per_rm)
    }

    /// Headline result, e.g. `5.00 KM per RM`.
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{} KM per RM", to_fixed2(self.km_per_rm))
    }

    /// One-sentence description of the calculation.
    #[must_use]
    pub fn summary(&self, input: &FuelInput) -> String {
        format!(
            "Based on a {} KM trip, using {} liters of {} at RM{} per liter, for RM{} over {} days.",
            input.mileage,
            to_fixed2(self.total_liters),
            input.fuel_type,
            to_fixed2(input.liters_price),
            to_fixed2(input.pump_amount),
            input.duration_days
        )
    }
}
