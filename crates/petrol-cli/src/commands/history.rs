//! History command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use petrol_store::{DEFAULT_PAGE_SIZE, EntryQuery, Ledger};

use crate::cli::OutputFormat;
use crate::format::{
    FormatOptions, format_entries_csv, format_history_csv, format_history_json,
    format_history_text, format_page_text,
};
use crate::util::write_output;

/// Arguments for the history command.
pub struct HistoryArgs {
    pub all: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Which slice of the history to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    /// The bounded recent view.
    Recent,
    /// One page of the full history.
    Page { page: u32, per_page: u32 },
    /// Every entry, for export.
    Export,
}

impl View {
    fn select(args: &HistoryArgs) -> Self {
        let paged = args.page.is_some() || args.per_page.is_some();
        match (args.all, paged, args.format) {
            (true, false, OutputFormat::Json | OutputFormat::Csv) => View::Export,
            (true, _, _) | (false, true, _) => View::Page {
                page: args.page.unwrap_or(1),
                per_page: args.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
            },
            (false, false, _) => View::Recent,
        }
    }
}

pub async fn cmd_history(ledger: &Ledger, args: HistoryArgs, opts: &FormatOptions) -> Result<()> {
    ledger.ready().await.context("Failed to open database")?;

    let content = match View::select(&args) {
        View::Recent => {
            let rows = ledger.load_history().await;
            match args.format {
                OutputFormat::Json => format_history_json(&rows, opts)?,
                OutputFormat::Csv => format_history_csv(&rows, opts),
                OutputFormat::Text => format_history_text(&rows, opts),
            }
        }
        View::Page { page, per_page } => {
            let page = ledger
                .view_all(page, per_page)
                .await
                .context("Failed to load history")?;
            match args.format {
                OutputFormat::Json => opts.as_json(&page)?,
                OutputFormat::Csv => format_history_csv(&page.rows, opts),
                OutputFormat::Text => format_page_text(&page, opts),
            }
        }
        View::Export => {
            let entries = ledger
                .entries(&EntryQuery::new())
                .await
                .context("Failed to load history")?;
            match args.format {
                OutputFormat::Csv => format_entries_csv(&entries, opts),
                _ => opts.as_json(&entries)?,
            }
        }
    };

    write_output(args.output.as_ref(), &content)
}
