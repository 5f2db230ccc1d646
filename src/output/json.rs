//! JSON report rendering for scripts and dashboards

use crate::{
    error::Result,
    models::RunReport,
};
use super::formatter::OutputFormatter;
use serde_json::json;

/// Formatter emitting the report as one pretty-printed JSON document
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn message(level: &str, message: &str) -> Result<String> {
        Ok(serde_json::to_string(&json!({ "level": level, "message": message }))?)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_header(&self, _title: &str) -> Result<String> {
        Ok(String::new())
    }

    fn format_run_summary(&self, report: &RunReport) -> Result<String> {
        let summary = json!({
            "endpoint": report.endpoint,
            "started_at": report.started_at,
            "elapsed_secs": report.elapsed_secs(),
            "peak_connections": report.peak_connections,
            "final_connections": report.final_connections,
            "throughput": report.throughput,
            "errors": report.errors,
        });
        Ok(serde_json::to_string_pretty(&summary)?)
    }

    fn format_kind_table(&self, report: &RunReport) -> Result<String> {
        let kinds = json!({ "move": report.moves, "state": report.states });
        Ok(serde_json::to_string_pretty(&kinds)?)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Self::message("warning", warning)
    }

    fn format_report(&self, report: &RunReport) -> Result<String> {
        let mut value = serde_json::to_value(report)?;
        value["elapsed_secs"] = json!(report.elapsed_secs());
        value["total_sent"] = json!(report.total_sent());
        value["total_received"] = json!(report.total_received());
        Ok(serde_json::to_string_pretty(&value)?)
    }
}
