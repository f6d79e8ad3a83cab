//! Stats command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use petrol_store::Ledger;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_stats_csv, format_stats_text};
use crate::util::write_output;

pub async fn cmd_stats(
    ledger: &Ledger,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let stats = ledger.stats().await.context("Failed to compute statistics")?;

    let content = match format {
        OutputFormat::Json => opts.as_json(&stats)?,
        OutputFormat::Csv => format_stats_csv(&stats, opts),
        OutputFormat::Text => format_stats_text(&stats, opts),
    };

    write_output(output, &content)
}
