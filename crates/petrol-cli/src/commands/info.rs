//! Info command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use petrol_store::{Ledger, SCHEMA_VERSION};
use serde::Serialize;
use tabled::builder::Builder;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, csv_escape};
use crate::style;
use crate::util::write_output;

/// Database location and contents.
#[derive(Debug, Serialize)]
pub struct DatabaseInfo {
    pub path: Option<PathBuf>,
    pub size_bytes: u64,
    pub entries: u64,
    pub schema_version: i32,
    pub history_limit: u32,
}

impl DatabaseInfo {
    pub async fn collect(ledger: &Ledger) -> Result<Self> {
        let entries = ledger.count().await.context("Failed to open database")?;
        let path = ledger.path().map(PathBuf::from);
        let size_bytes = match &path {
            Some(p) => std::fs::metadata(p)
                .with_context(|| format!("Failed to read {}", p.display()))?
                .len(),
            None => 0,
        };

        Ok(Self {
            path,
            size_bytes,
            entries,
            schema_version: SCHEMA_VERSION,
            history_limit: ledger.history_limit(),
        })
    }

    fn path_display(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string())
    }
}

fn format_info_text(info: &DatabaseInfo, opts: &FormatOptions) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Property", "Value"]);
    builder.push_record(["Path".to_string(), info.path_display()]);
    builder.push_record(["Size".to_string(), format_size(info.size_bytes)]);
    builder.push_record(["Entries".to_string(), info.entries.to_string()]);
    builder.push_record(["Schema version".to_string(), info.schema_version.to_string()]);
    builder.push_record(["History limit".to_string(), info.history_limit.to_string()]);

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);

    format!(
        "{}\n{}\n",
        style::format_title("Database Information", opts.no_color),
        table
    )
}

fn format_info_csv(info: &DatabaseInfo, opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "path,size_bytes,entries,schema_version,history_limit\n".to_string()
    };
    output.push_str(&format!(
        "{},{},{},{},{}\n",
        csv_escape(&info.path_display()),
        info.size_bytes,
        info.entries,
        info.schema_version,
        info.history_limit
    ));
    output
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

pub async fn cmd_info(
    ledger: &Ledger,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let info = DatabaseInfo::collect(ledger).await?;

    let content = match format {
        OutputFormat::Json => opts.as_json(&info)?,
        OutputFormat::Csv => format_info_csv(&info, opts),
        OutputFormat::Text => format_info_text(&info, opts),
    };

    write_output(output, &content)
}
