//! Command-line interface

use crate::logging::LogFormat;
use clap::Parser;

/// Game Load Tester - WebSocket load generator for binary-protocol game servers
#[derive(Parser, Debug, Clone)]
#[command(name = "glt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// WebSocket endpoint of the game server (ws://host:port/path)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Number of concurrent simulated clients
    #[arg(short, long)]
    pub clients: Option<u32>,

    /// Test duration in seconds
    #[arg(short, long, value_parser = parse_seconds)]
    pub duration: Option<u64>,

    /// Messages per second, per client, per message kind
    #[arg(short, long)]
    pub rate: Option<u32>,

    /// Query parameter carrying the random client identity
    #[arg(long, value_name = "NAME", conflicts_with = "no_identity")]
    pub identity_param: Option<String>,

    /// Connect without an identity query parameter
    #[arg(long)]
    pub no_identity: bool,

    /// Close handshake grace timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub close_timeout: Option<u64>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Log line format (console, json, compact)
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// List the supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,

    /// Write an example .env file to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub write_env_example: Option<std::path::PathBuf>,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }
        Ok(())
    }

    /// Explicit color choice from the flags, None when left to the environment
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Command-line Overrides:\n");
        if let Some(ref endpoint) = self.endpoint {
            summary.push_str(&format!("  Endpoint: {}\n", endpoint));
        }
        if let Some(clients) = self.clients {
            summary.push_str(&format!("  Clients: {}\n", clients));
        }
        if let Some(duration) = self.duration {
            summary.push_str(&format!("  Duration: {}s\n", duration));
        }
        if let Some(rate) = self.rate {
            summary.push_str(&format!("  Rate: {} msg/s\n", rate));
        }
        if self.no_identity {
            summary.push_str("  Identity: disabled\n");
        } else if let Some(ref param) = self.identity_param {
            summary.push_str(&format!("  Identity parameter: {}\n", param));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  JSON report: {}\n", self.json));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// Parse a whole number of seconds
fn parse_seconds(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }
    s.parse::<u64>().map_err(|_| format!("Invalid duration: {}", s))
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    cfg!(unix)
}
