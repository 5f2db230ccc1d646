//! Colored formatter implementation with terminal color support
//!
//! Uses ANSI colors and Unicode symbols; latency figures are colored by
//! how close they are to a real-time tick budget.

use crate::{
    error::{AppError, Result},
    models::{KindSummary, RunReport},
};
use super::formatter::{format_elapsed, format_latency, FormattingOptions, OutputFormatter};
use std::fmt::Write as _;
use colored::*;

/// Latency classification for color coding
#[derive(Debug, Clone, PartialEq)]
pub enum LatencyLevel {
    Excellent,  // < 10ms
    Good,       // 10-50ms
    Fair,       // 50-100ms
    Poor,       // 100-500ms
    VeryPoor,   // > 500ms
}

impl LatencyLevel {
    /// Determine level from an average latency in milliseconds
    pub fn from_latency(latency_ms: f64) -> Self {
        if latency_ms < 10.0 {
            Self::Excellent
        } else if latency_ms < 50.0 {
            Self::Good
        } else if latency_ms < 100.0 {
            Self::Fair
        } else if latency_ms < 500.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::VeryPoor => Color::Red,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Excellent => "🚀",
            Self::Good => "⚡",
            Self::Fair => "🔶",
            Self::Poor => "⚠️",
            Self::VeryPoor => "🔴",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self { options, color_scheme }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn create_section_header(&self, title: &str, icon: &str) -> String {
        if self.options.enable_color {
            format!("{} {}", icon, title.bold().color(self.color_scheme.header))
        } else {
            format!("{} {}", icon, title)
        }
    }

    fn format_latency_colored(&self, summary: &KindSummary) -> String {
        if summary.received == 0 {
            return self.colorize("no replies", self.color_scheme.muted).to_string();
        }
        let level = LatencyLevel::from_latency(summary.avg_latency_ms);
        format!(
            "{} {}",
            self.colorize(&format_latency(summary.avg_latency_ms), level.color()),
            level.symbol()
        )
    }

    /// Reply ratio of a kind, colored by how much of the traffic was answered
    fn format_reply_ratio(&self, summary: &KindSummary) -> String {
        if summary.sent == 0 {
            return self.colorize("-", self.color_scheme.muted).to_string();
        }
        let ratio = summary.received as f64 * 100.0 / summary.sent as f64;
        let color = if ratio >= 95.0 {
            self.color_scheme.success
        } else if ratio >= 50.0 {
            self.color_scheme.warning
        } else {
            self.color_scheme.error
        };
        self.colorize(&format!("{:.1}%", ratio), color).to_string()
    }
}

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();

        let decorated_title = format!("🎮 {}", title);
        let border = "═".repeat(decorated_title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(fmt_err)?;
        writeln!(output, "  {}  ", self.bold(&decorated_title).color(self.color_scheme.header)).map_err(fmt_err)?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_run_summary(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.create_section_header("Run Summary", "📊")).map_err(fmt_err)?;
        writeln!(output, "🎯 Endpoint:          {}", self.colorize(&report.endpoint, self.color_scheme.info))
            .map_err(fmt_err)?;
        if self.options.verbose_mode {
            writeln!(output, "🕒 Started:           {}", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"))
                .map_err(fmt_err)?;
        }
        writeln!(output, "⏱️  Duration:          {}", format_elapsed(report.elapsed_secs())).map_err(fmt_err)?;
        writeln!(output, "🔌 Peak Connections:  {}", report.peak_connections).map_err(fmt_err)?;

        let live_color = if report.final_connections == i64::from(report.peak_connections) {
            self.color_scheme.success
        } else {
            self.color_scheme.warning
        };
        writeln!(
            output,
            "🔗 Final Connections: {}",
            self.colorize(&report.final_connections.to_string(), live_color)
        )
        .map_err(fmt_err)?;
        writeln!(
            output,
            "📈 Throughput:        {}",
            self.bold(&format!("{:.2} msg/s", report.throughput))
        )
        .map_err(fmt_err)?;
        if self.options.verbose_mode {
            writeln!(output, "📤 Total Sent:        {}", report.total_sent()).map_err(fmt_err)?;
            writeln!(output, "📥 Total Received:    {}", report.total_received()).map_err(fmt_err)?;
        }

        let error_color = if report.errors == 0 {
            self.color_scheme.success
        } else {
            self.color_scheme.error
        };
        write!(output, "❗ Errors:            {}", self.colorize(&report.errors.to_string(), error_color))
            .map_err(fmt_err)?;

        Ok(output)
    }

    fn format_kind_table(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();
        let rule = "─".repeat(64);

        writeln!(output, "{}", self.create_section_header("Messages", "✉️")).map_err(fmt_err)?;
        writeln!(output, "{}", self.colorize(&rule, self.color_scheme.border)).map_err(fmt_err)?;
        let header = format!("{:<8} {:>10} {:>10} {:>10} {:>18}", "Kind", "Sent", "Received", "Replied", "Avg Latency");
        writeln!(output, "{}", self.bold(&header)).map_err(fmt_err)?;
        writeln!(output, "{}", self.colorize(&rule, self.color_scheme.border)).map_err(fmt_err)?;

        for (name, summary) in [("Move", &report.moves), ("State", &report.states)] {
            writeln!(
                output,
                "{:<8} {:>10} {:>10} {:>10} {:>18}",
                name,
                summary.sent,
                summary.received,
                self.format_reply_ratio(summary),
                self.format_latency_colored(summary)
            )
            .map_err(fmt_err)?;
        }
        write!(output, "{}", self.colorize(&rule, self.color_scheme.border)).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("⚠️  {}", self.colorize(warning, self.color_scheme.warning)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::formatter::tests::sample_report;

    fn uncolored() -> ColoredFormatter {
        ColoredFormatter::new(FormattingOptions {
            enable_color: false,
            verbose_mode: true,
            table_borders: true,
        })
    }

    #[test]
    fn test_latency_levels() {
        assert_eq!(LatencyLevel::from_latency(2.0), LatencyLevel::Excellent);
        assert_eq!(LatencyLevel::from_latency(20.0), LatencyLevel::Good);
        assert_eq!(LatencyLevel::from_latency(75.0), LatencyLevel::Fair);
        assert_eq!(LatencyLevel::from_latency(250.0), LatencyLevel::Poor);
        assert_eq!(LatencyLevel::from_latency(900.0), LatencyLevel::VeryPoor);
    }

    #[test]
    fn test_kind_without_replies_is_marked() {
        let table = uncolored().format_kind_table(&sample_report()).unwrap();
        let move_line = table.lines().find(|l| l.starts_with("Move")).unwrap();
        assert!(move_line.contains("no replies"));
        let state_line = table.lines().find(|l| l.starts_with("State")).unwrap();
        assert!(state_line.contains("2.00ms"));
        assert!(state_line.contains("93.3%"));
    }

    #[test]
    fn test_verbose_summary_includes_totals() {
        let summary = uncolored().format_run_summary(&sample_report()).unwrap();
        assert!(summary.contains("Total Sent:        60"));
        assert!(summary.contains("Total Received:    28"));
        assert!(summary.contains("14.00 msg/s"));
    }

    #[test]
    fn test_warning_message() {
        let formatter = uncolored();
        assert!(formatter.format_warning("careful").unwrap().contains("careful"));
    }

    #[test]
    fn test_full_report_uses_default_composition() {
        let report = uncolored().format_report(&sample_report()).unwrap();
        assert!(report.contains("Load Test Results"));
        assert!(report.contains("Messages"));
    }
}
