//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    error::{AppError, Result},
    models::{KindSummary, RunReport},
};
use std::fmt::Write as _;

/// Main trait for report formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format run-level figures: duration, connections, throughput, errors
    fn format_run_summary(&self, report: &RunReport) -> Result<String>;

    /// Format the per-kind sent/received/latency table
    fn format_kind_table(&self, report: &RunReport) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format the complete report
    fn format_report(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("Load Test Results")?);
        output.push_str("\n\n");
        output.push_str(&self.format_run_summary(report)?);
        output.push_str("\n\n");
        output.push_str(&self.format_kind_table(report)?);
        output.push('\n');
        Ok(output)
    }
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
    pub show_header: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment, min_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Columns of the per-kind table
pub(crate) fn kind_table_format(show_borders: bool) -> TableFormat {
    TableFormat {
        columns: vec![
            Column::new("Kind", Alignment::Left, 8),
            Column::new("Sent", Alignment::Right, 10),
            Column::new("Received", Alignment::Right, 10),
            Column::new("Avg Latency", Alignment::Right, 12),
        ],
        show_borders,
        show_header: true,
    }
}

/// Rows of the per-kind table, one per tracked kind
pub(crate) fn kind_rows(report: &RunReport) -> Vec<RowData> {
    let row = |name: &str, summary: &KindSummary| {
        vec![
            name.to_string(),
            summary.sent.to_string(),
            summary.received.to_string(),
            format_latency(summary.avg_latency_ms),
        ]
    };
    vec![row("Move", &report.moves), row("State", &report.states)]
}

/// Format a latency in milliseconds
pub fn format_latency(latency_ms: f64) -> String {
    if latency_ms < 1.0 {
        format!("{:.3}ms", latency_ms)
    } else if latency_ms < 1000.0 {
        format!("{:.2}ms", latency_ms)
    } else {
        format!("{:.2}s", latency_ms / 1000.0)
    }
}

/// Format an elapsed time in seconds
pub fn format_elapsed(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let minutes = (secs / 60.0) as u64;
        format!("{}m{:.1}s", minutes, secs % 60.0)
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&widths));
                output.push('\n');
            }
            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &widths, format));
            output.push('\n');
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
        }

        output
    }

    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format.columns.len().max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        (0..num_columns)
            .map(|idx| {
                let base = format
                    .columns
                    .get(idx)
                    .map(|c| c.min_width.max(c.header.len()))
                    .unwrap_or(0);
                rows.iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(base, usize::max)
            })
            .collect()
    }

    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format.columns.get(idx).map(|c| &c.alignment).unwrap_or(&Alignment::Left);
            let padded = align_text(cell, width, alignment);

            if format.show_borders {
                row.push(' ');
                row.push_str(&padded);
                row.push_str(" |");
            } else {
                row.push_str(&padded);
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::from("+");
        for &width in widths {
            border.push_str(&"-".repeat(width + 2));
            border.push('+');
        }
        border
    }
}

/// Align text within specified width
pub(crate) fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }

    let padding = width - len;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(padding - left_pad))
        }
    }
}

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_run_summary(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Run Summary:").map_err(fmt_err)?;
        writeln!(output, "------------").map_err(fmt_err)?;
        writeln!(output, "Endpoint:           {}", report.endpoint).map_err(fmt_err)?;
        if self.options.verbose_mode {
            writeln!(output, "Started:            {}", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"))
                .map_err(fmt_err)?;
        }
        writeln!(output, "Duration:           {}", format_elapsed(report.elapsed_secs())).map_err(fmt_err)?;
        writeln!(output, "Peak Connections:   {}", report.peak_connections).map_err(fmt_err)?;
        writeln!(output, "Final Connections:  {}", report.final_connections).map_err(fmt_err)?;
        writeln!(output, "Throughput:         {:.2} msg/s", report.throughput).map_err(fmt_err)?;
        if self.options.verbose_mode {
            writeln!(output, "Total Sent:         {}", report.total_sent()).map_err(fmt_err)?;
            writeln!(output, "Total Received:     {}", report.total_received()).map_err(fmt_err)?;
        }
        write!(output, "Errors:             {}", report.errors).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_kind_table(&self, report: &RunReport) -> Result<String> {
        let format = kind_table_format(self.options.table_borders);
        Ok(self.create_table(&format, &kind_rows(report)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }
}
