//! Calc command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::{Input, theme::ColorfulTheme};
use petrol_store::Ledger;
use petrol_types::{CalculatorForm, Field};

use crate::cli::{CalcArgs, OutputFormat};
use crate::format::{FormatOptions, format_submission_csv, format_submission_text};
use crate::style;
use crate::util::{is_interactive, write_output};

fn prompt_label(field: Field) -> &'static str {
    match field {
        Field::Mileage => "Mileage (KM)",
        Field::FuelType => "Fuel type",
        Field::LitersPrice => "Price per liter (RM)",
        Field::PumpAmount => "Pump amount (RM)",
        Field::DurationDays => "Duration (days)",
    }
}

fn prompt(field: Field) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt_label(field))
        .interact_text()
        .with_context(|| format!("Failed to read {}", field))
}

/// Fill the form from arguments, prompting for missing values when possible.
///
/// Without a terminal, missing values stay blank and fail validation.
pub fn build_form(args: CalcArgs, interactive: bool) -> Result<CalculatorForm> {
    let fill = |value: Option<String>, field: Field| -> Result<String> {
        match value {
            Some(v) => Ok(v),
            None if interactive => prompt(field),
            None => Ok(String::new()),
        }
    };

    Ok(CalculatorForm {
        mileage: fill(args.mileage, Field::Mileage)?,
        fuel_type: fill(args.fuel_type, Field::FuelType)?,
        liters_price: fill(args.price, Field::LitersPrice)?,
        pump_amount: fill(args.amount, Field::PumpAmount)?,
        duration_days: fill(args.days, Field::DurationDays)?,
    })
}

pub async fn cmd_calc(
    ledger: &Ledger,
    args: CalcArgs,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
    quiet: bool,
) -> Result<()> {
    let mut form = build_form(args, is_interactive())?;
    let submission = ledger.submit(&mut form).await?;

    if !submission.persisted() && !quiet {
        eprintln!(
            "{}",
            style::format_warning(
                "Could not save this calculation; run with --verbose for details",
                opts.no_color
            )
        );
    }

    let content = match format {
        OutputFormat::Json => opts.as_json(&submission)?,
        OutputFormat::Csv => format_submission_csv(&submission, opts),
        OutputFormat::Text => format_submission_text(&submission, opts),
    };

    write_output(output, &content)
}
