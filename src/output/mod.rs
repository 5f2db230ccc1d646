//! Report formatting and display
//!
//! Plain, colored and JSON renderings of the final run report, selected
//! through `OutputFormatterFactory`.

mod formatter;
mod colored;
mod json;

pub use formatter::{
    OutputFormatter,
    PlainFormatter,
    TableFormat,
    FormattingOptions,
    Column,
    Alignment,
    RowData,
    format_latency,
    format_elapsed,
};
pub use colored::{
    ColoredFormatter,
    ColorScheme,
    LatencyLevel,
};
pub use json::JsonFormatter;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and the JSON preference
    pub fn create_formatter(enable_color: bool, json: bool) -> Box<dyn OutputFormatter> {
        Self::create_formatter_with_options(
            json,
            FormattingOptions {
                enable_color,
                ..Default::default()
            },
        )
    }

    /// Create a formatter with explicit options
    pub fn create_formatter_with_options(json: bool, options: FormattingOptions) -> Box<dyn OutputFormatter> {
        if json {
            Box::new(JsonFormatter::new())
        } else if options.enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create the formatter matching a run configuration
    pub fn for_config(config: &crate::models::Config) -> Box<dyn OutputFormatter> {
        Self::create_formatter_with_options(
            config.json_output,
            FormattingOptions {
                enable_color: config.enable_color,
                verbose_mode: config.verbose,
                table_borders: true,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;
    use formatter::tests::sample_report;

    #[test]
    fn test_factory_selects_json() {
        let output = OutputFormatterFactory::create_formatter(true, true)
            .format_report(&sample_report())
            .unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&output).is_ok());
    }

    #[test]
    fn test_factory_selects_plain() {
        let output = OutputFormatterFactory::create_formatter(false, false)
            .format_report(&sample_report())
            .unwrap();
        assert!(output.contains("Run Summary:"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_formatter_follows_config() {
        let config = Config {
            enable_color: false,
            verbose: true,
            ..Default::default()
        };
        let output = OutputFormatterFactory::for_config(&config)
            .format_report(&sample_report())
            .unwrap();
        assert!(output.contains("Total Sent:"));
    }
}
