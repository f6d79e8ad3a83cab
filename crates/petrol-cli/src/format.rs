//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use petrol_store::{HistoryStats, Submission};
use petrol_types::{FuelEntry, HistoryPage, HistoryRow, format_date, to_fixed2};
use tabled::builder::Builder;

use crate::cli::StyleMode;
use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Visual styling mode.
    pub style: StyleMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            no_color: false,
            no_header: false,
            compact: false,
            style: StyleMode::Rich,
        }
    }
}

impl FormatOptions {
    pub fn new(no_color: bool, style: StyleMode) -> Self {
        // Plain mode automatically disables colors for pipe-friendliness
        Self {
            no_color: no_color || style == StyleMode::Plain,
            style,
            ..Self::default()
        }
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// Escape a value for CSV output.
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(to_fixed2).unwrap_or_default()
}

fn history_table(rows: &[HistoryRow], opts: &FormatOptions) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Date", "Fuel", "Price", "KM per RM"]);
    for row in rows {
        builder.push_record([
            row.date.as_str(),
            row.fuel_type.as_str(),
            row.liters_price.as_str(),
            row.km_per_rm.as_str(),
        ]);
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);
    format!("{}\n", table)
}

// ============================================================================
// Calculation
// ============================================================================

/// Format a calculator submission: result, summary and the refreshed history.
pub fn format_submission_text(submission: &Submission, opts: &FormatOptions) -> String {
    let mut output = format!(
        "{}\n{}\n",
        style::format_headline(&submission.headline, opts.no_color),
        submission.summary
    );

    match &submission.history {
        Some(rows) => {
            output.push('\n');
            output.push_str(&format_history_text(rows, opts));
        }
        None => {
            output.push('\n');
            output.push_str(&style::format_warning(
                "Result was not saved to history",
                opts.no_color,
            ));
            output.push('\n');
        }
    }

    output
}

/// Format a submission as a single CSV row.
pub fn format_submission_csv(submission: &Submission, opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "mileage,fuel_type,liters_price,pump_amount,duration_days,total_liters,km_per_rm,saved\n"
            .to_string()
    };

    let input = &submission.input;
    output.push_str(&format!(
        "{},{},{},{},{},{},{},{}\n",
        input.mileage,
        csv_escape(&input.fuel_type),
        input.liters_price,
        input.pump_amount,
        input.duration_days,
        to_fixed2(submission.calculation.total_liters),
        submission.calculation.km_per_rm_display(),
        submission.persisted()
    ));
    output
}

// ============================================================================
// History
// ============================================================================

/// Format the recent-history table.
pub fn format_history_text(rows: &[HistoryRow], opts: &FormatOptions) -> String {
    if rows.is_empty() {
        return "No history records found.\n".to_string();
    }

    let mut output = format!(
        "{}\n",
        style::format_title(&format!("Recent History ({})", rows.len()), opts.no_color)
    );
    output.push_str(&history_table(rows, opts));
    output
}

/// Format history rows as CSV.
pub fn format_history_csv(rows: &[HistoryRow], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "id,date,fuel_type,liters_price,km_per_rm\n".to_string()
    };

    for row in rows {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            row.id,
            row.date,
            csv_escape(&row.fuel_type),
            csv_escape(&row.liters_price),
            row.km_per_rm
        ));
    }
    output
}

/// Format history rows as JSON.
pub fn format_history_json(rows: &[HistoryRow], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&rows)
}

/// Format one page of the full history.
pub fn format_page_text(page: &HistoryPage, opts: &FormatOptions) -> String {
    if page.total == 0 {
        return "No history records found.\n".to_string();
    }

    let mut output = format!(
        "{}\n",
        style::format_title(&format!("Full History ({} entries)", page.total), opts.no_color)
    );

    if page.rows.is_empty() {
        output.push_str("No entries on this page.\n");
    } else {
        output.push_str(&history_table(&page.rows, opts));
    }

    output.push_str(&format!("Page {} of {}\n", page.page, page.page_count()));
    output
}

/// Export full entries as CSV with every stored column.
pub fn format_entries_csv(entries: &[FuelEntry], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "id,date,mileage,fuel_type,liters_price,pump_amount,duration_days,km_per_rm\n".to_string()
    };

    for entry in entries {
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            entry.id,
            format_date(entry.date),
            entry.mileage_reading,
            csv_escape(&entry.fuel_type),
            entry.liters_price,
            entry.pump_amount,
            entry.duration_days,
            entry.km_per_rm_display
        ));
    }
    output
}

// ============================================================================
// Statistics
// ============================================================================

/// Format aggregate statistics.
pub fn format_stats_text(stats: &HistoryStats, opts: &FormatOptions) -> String {
    if stats.count == 0 {
        return "No history records found.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Statistic", "Value"]);
    builder.push_record(["Entries".to_string(), stats.count.to_string()]);
    builder.push_record([
        "Total distance".to_string(),
        format!("{} KM", to_fixed2(stats.total_distance)),
    ]);
    builder.push_record([
        "Total spent".to_string(),
        format!("RM{}", to_fixed2(stats.total_spent)),
    ]);
    builder.push_record([
        "Average KM per RM".to_string(),
        fmt_opt(stats.average_km_per_rm),
    ]);
    builder.push_record([
        "Overall KM per RM".to_string(),
        fmt_opt(stats.overall_km_per_rm),
    ]);
    if let (Some(first), Some(last)) = (stats.first_date, stats.last_date) {
        builder.push_record([
            "Period".to_string(),
            format!("{} to {}", format_date(first), format_date(last)),
        ]);
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);

    format!(
        "{}\n{}\n",
        style::format_title("Statistics", opts.no_color),
        table
    )
}

/// Format aggregate statistics as CSV.
pub fn format_stats_csv(stats: &HistoryStats, opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "count,total_distance,total_spent,average_km_per_rm,overall_km_per_rm,first_date,last_date\n"
            .to_string()
    };

    output.push_str(&format!(
        "{},{},{},{},{},{},{}\n",
        stats.count,
        to_fixed2(stats.total_distance),
        to_fixed2(stats.total_spent),
        fmt_opt(stats.average_km_per_rm),
        fmt_opt(stats.overall_km_per_rm),
        stats.first_date.map(format_date).unwrap_or_default(),
        stats.last_date.map(format_date).unwrap_or_default()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrol_types::{CalculatorForm, Calculation};
    use time::macros::date;

    fn plain() -> FormatOptions {
        FormatOptions::new(true, StyleMode::Plain)
    }

    fn row(id: i64, fuel: &str) -> HistoryRow {
        HistoryRow {
            id,
            date: "2026-03-14".to_string(),
            fuel_type: fuel.to_string(),
            liters_price: "RM2.05".to_string(),
            km_per_rm: "5.00".to_string(),
        }
    }

    fn submission(history: Option<Vec<HistoryRow>>) -> Submission {
        let input = CalculatorForm::new("500", "RON95", "2.05", "100", "7")
            .parse()
            .unwrap();
        let calculation = Calculation::compute(&input);
        Submission {
            headline: calculation.headline(),
            summary: calculation.summary(&input),
            input,
            calculation,
            entry: None,
            history,
        }
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("RON95"), "RON95");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_plain_disables_color() {
        let opts = FormatOptions::new(false, StyleMode::Plain);
        assert!(opts.no_color);
        assert_eq!(opts.style, StyleMode::Plain);
        assert!(!FormatOptions::new(false, StyleMode::Rich).no_color);
    }

    #[test]
    fn test_as_json_compact_and_pretty() {
        let value = serde_json::json!({"a": 1});
        assert_eq!(
            plain().with_compact(true).as_json(&value).unwrap(),
            "{\"a\":1}\n"
        );
        assert!(plain().as_json(&value).unwrap().contains("\n  \"a\": 1"));
    }

    #[test]
    fn test_history_text_empty() {
        assert_eq!(
            format_history_text(&[], &plain()),
            "No history records found.\n"
        );
    }

    #[test]
    fn test_history_text_contains_cells() {
        let text = format_history_text(&[row(2, "RON97"), row(1, "RON95")], &plain());
        assert!(text.contains("Recent History (2)"));
        assert!(text.contains("KM per RM"));
        assert!(text.contains("RON97"));
        assert!(text.contains("RM2.05"));
        assert!(text.find("RON97") < text.find("RON95"));
    }

    #[test]
    fn test_history_csv() {
        let csv = format_history_csv(&[row(3, "Diesel, B10")], &plain());
        assert_eq!(
            csv,
            "id,date,fuel_type,liters_price,km_per_rm\n3,2026-03-14,\"Diesel, B10\",RM2.05,5.00\n"
        );

        let no_header = format_history_csv(&[row(3, "RON95")], &plain().with_no_header(true));
        assert_eq!(no_header, "3,2026-03-14,RON95,RM2.05,5.00\n");
    }

    #[test]
    fn test_history_json_uses_wire_names() {
        let json = format_history_json(&[row(1, "RON95")], &plain()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["kmPerRM"], "5.00");
        assert_eq!(parsed[0]["litersPrice"], "RM2.05");
        assert_eq!(parsed[0]["fuelType"], "RON95");
    }

    #[test]
    fn test_submission_text_with_history() {
        let text = format_submission_text(&submission(Some(vec![row(1, "RON95")])), &plain());
        assert!(text.starts_with("5.00 KM per RM\n"));
        assert!(text.contains("48.78 liters of RON95"));
        assert!(text.contains("Recent History (1)"));
    }

    #[test]
    fn test_submission_text_not_saved() {
        let text = format_submission_text(&submission(None), &plain());
        assert!(text.contains("5.00 KM per RM"));
        assert!(text.contains("[!!] Result was not saved to history"));
    }

    #[test]
    fn test_submission_csv() {
        let csv = format_submission_csv(&submission(None), &plain().with_no_header(true));
        assert_eq!(csv, "500,RON95,2.05,100,7,48.78,5.00,false\n");
    }

    #[test]
    fn test_submission_csv_rounds_tied_values_up() {
        let input = CalculatorForm::new("1", "RON95", "8", "1", "7").parse().unwrap();
        let calculation = Calculation::compute(&input);
        let tied = Submission {
            headline: calculation.headline(),
            summary: calculation.summary(&input),
            input,
            calculation,
            entry: None,
            history: None,
        };

        let csv = format_submission_csv(&tied, &plain().with_no_header(true));
        assert_eq!(csv, "1,RON95,8,1,7,0.13,1.00,false\n");
        assert!(format_submission_text(&tied, &plain()).starts_with("1.00 KM per RM\n"));
    }

    #[test]
    fn test_stats_average_rounds_tied_values_up() {
        let stats = HistoryStats {
            count: 1,
            total_distance: 0.125,
            total_spent: 1.0,
            average_km_per_rm: Some(0.125),
            overall_km_per_rm: Some(0.125),
            first_date: Some(date!(2026 - 03 - 14)),
            last_date: Some(date!(2026 - 03 - 14)),
        };
        let csv = format_stats_csv(&stats, &plain().with_no_header(true));
        assert_eq!(csv, "1,0.13,1.00,0.13,0.13,2026-03-14,2026-03-14\n");
    }

    #[test]
    fn test_page_text_footer() {
        let page = HistoryPage {
            page: 2,
            per_page: 1,
            total: 3,
            rows: vec![row(2, "RON95")],
        };
        let text = format_page_text(&page, &plain());
        assert!(text.contains("Full History (3 entries)"));
        assert!(text.ends_with("Page 2 of 3\n"));
    }

    #[test]
    fn test_page_text_past_end() {
        let page = HistoryPage {
            page: 9,
            per_page: 25,
            total: 3,
            rows: vec![],
        };
        let text = format_page_text(&page, &plain());
        assert!(text.contains("No entries on this page."));
        assert!(text.ends_with("Page 9 of 1\n"));
    }

    #[test]
    fn test_entries_csv() {
        let entry = FuelEntry {
            id: 7,
            date: date!(2026 - 03 - 14),
            mileage_reading: 500.0,
            fuel_type: "RON95".to_string(),
            liters_price: 2.05,
            pump_amount: 100.0,
            duration_days: 7,
            km_per_rm: 5.0,
            km_per_rm_display: "5.00".to_string(),
        };
        let csv = format_entries_csv(&[entry], &plain().with_no_header(true));
        assert_eq!(csv, "7,2026-03-14,500,RON95,2.05,100,7,5.00\n");
    }

    #[test]
    fn test_stats_text_and_csv() {
        let stats = HistoryStats {
            count: 2,
            total_distance: 800.0,
            total_spent: 200.0,
            average_km_per_rm: Some(4.0),
            overall_km_per_rm: Some(4.0),
            first_date: Some(date!(2026 - 03 - 01)),
            last_date: Some(date!(2026 - 03 - 14)),
        };

        let text = format_stats_text(&stats, &plain());
        assert!(text.contains("800.00 KM"));
        assert!(text.contains("RM200.00"));
        assert!(text.contains("2026-03-01 to 2026-03-14"));

        let csv = format_stats_csv(&stats, &plain().with_no_header(true));
        assert_eq!(csv, "2,800.00,200.00,4.00,4.00,2026-03-01,2026-03-14\n");
    }

    #[test]
    fn test_stats_empty() {
        let stats = HistoryStats::default();
        assert_eq!(
            format_stats_text(&stats, &plain()),
            "No history records found.\n"
        );
        assert_eq!(
            format_stats_csv(&stats, &plain().with_no_header(true)),
            "0,0.00,0.00,,,,\n"
        );
    }
}
