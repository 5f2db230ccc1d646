//! Configuration data model and validation

use crate::logging::LogFormat;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Load test configuration, immutable for the duration of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// WebSocket endpoint of the game server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Number of concurrent simulated clients
    #[serde(default = "default_clients")]
    pub clients: u32,

    /// Run window length in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,

    /// Messages per second, per client, per message kind
    #[serde(default = "default_rate")]
    pub rate: u32,

    /// Query parameter carrying a random per-client identity, if any
    #[serde(default = "default_identity_param")]
    pub identity_param: Option<String>,

    /// How long a closing worker waits for the server's close reply
    #[serde(default = "default_close_timeout_ms")]
    pub close_timeout_ms: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Render the final report as JSON
    #[serde(default)]
    pub json_output: bool,

    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            clients: default_clients(),
            duration_secs: default_duration_secs(),
            rate: default_rate(),
            identity_param: default_identity_param(),
            close_timeout_ms: default_close_timeout_ms(),
            enable_color: default_enable_color(),
            json_output: false,
            log_format: LogFormat::default(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Run window as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// Interval between two ticks of a worker's send timer (`1000ms / rate`)
    pub fn send_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.rate.max(1)))
    }

    /// Close grace timeout as a Duration
    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }

    /// Parse the endpoint into a URL
    pub fn endpoint_url(&self) -> Result<Url> {
        Url::parse(&self.endpoint)
            .map_err(|e| AppError::config(format!("Invalid endpoint '{}': {}", self.endpoint, e)))
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        use crate::defaults::{MAX_CLIENTS, MAX_CLOSE_TIMEOUT_MS, MAX_DURATION_SECS, MAX_RATE};

        if self.endpoint.is_empty() {
            return Err(AppError::config("Endpoint cannot be empty"));
        }

        let url = self.endpoint_url()?;
        if url.scheme() != "ws" {
            return Err(AppError::config(format!("Endpoint must use ws://: {}", self.endpoint)));
        }
        if url.host_str().is_none() {
            return Err(AppError::config(format!("Endpoint has no host: {}", self.endpoint)));
        }

        if self.clients == 0 {
            return Err(AppError::config("Client count must be greater than 0"));
        }
        if self.clients > MAX_CLIENTS {
            return Err(AppError::config(format!("Client count cannot exceed {}", MAX_CLIENTS)));
        }

        if self.duration_secs == 0 {
            return Err(AppError::config("Test duration must be greater than 0"));
        }
        if self.duration_secs > MAX_DURATION_SECS {
            return Err(AppError::config(format!("Test duration cannot exceed {} seconds", MAX_DURATION_SECS)));
        }

        if self.rate == 0 {
            return Err(AppError::config("Message rate must be greater than 0"));
        }
        if self.rate > MAX_RATE {
            return Err(AppError::config(format!("Message rate cannot exceed {} per second", MAX_RATE)));
        }

        if self.close_timeout_ms == 0 || self.close_timeout_ms > MAX_CLOSE_TIMEOUT_MS {
            return Err(AppError::config(format!("Close timeout must be between 1 and {} ms", MAX_CLOSE_TIMEOUT_MS)));
        }

        if let Some(param) = &self.identity_param {
            if param.trim().is_empty() {
                return Err(AppError::config("Identity parameter name cannot be empty"));
            }
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(endpoint) = std::env::var("TARGET_ENDPOINT") {
            self.endpoint = endpoint.trim().to_string();
        }

        if let Ok(clients) = std::env::var("CLIENTS_COUNT") {
            self.clients = clients.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid CLIENTS_COUNT value '{}': {}", clients, e)))?;
        }

        if let Ok(duration) = std::env::var("TEST_DURATION_SEC") {
            self.duration_secs = duration.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TEST_DURATION_SEC value '{}': {}", duration, e)))?;
        }

        if let Ok(rate) = std::env::var("MESSAGE_RATE") {
            self.rate = rate.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid MESSAGE_RATE value '{}': {}", rate, e)))?;
        }

        if let Ok(param) = std::env::var("IDENTITY_PARAM") {
            let param = param.trim();
            self.identity_param = if param.is_empty() { None } else { Some(param.to_string()) };
        }

        if let Ok(timeout) = std::env::var("CLOSE_TIMEOUT_MS") {
            self.close_timeout_ms = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid CLOSE_TIMEOUT_MS value '{}': {}", timeout, e)))?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_endpoint() -> String {
    crate::defaults::DEFAULT_ENDPOINT.to_string()
}

fn default_clients() -> u32 {
    crate::defaults::DEFAULT_CLIENTS_COUNT
}

fn default_duration_secs() -> u64 {
    crate::defaults::DEFAULT_TEST_DURATION.as_secs()
}

fn default_rate() -> u32 {
    crate::defaults::DEFAULT_MESSAGE_RATE
}

fn default_identity_param() -> Option<String> {
    Some(crate::defaults::DEFAULT_IDENTITY_PARAM.to_string())
}

fn default_close_timeout_ms() -> u64 {
    crate::defaults::DEFAULT_CLOSE_TIMEOUT.as_millis() as u64
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.identity_param.as_deref(), Some("name"));
    }

    #[test]
    fn test_send_interval_from_rate() {
        let mut config = Config::default();
        config.rate = 5;
        assert_eq!(config.send_interval(), Duration::from_millis(200));

        config.rate = 60;
        assert_eq!(config.send_interval(), Duration::from_micros(16_666));
    }

    #[test]
    fn test_non_websocket_scheme_invalid() {
        let mut config = Config::default();
        config.endpoint = "http://127.0.0.1:8080".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tls_endpoint_invalid() {
        let mut config = Config::default();
        config.endpoint = "wss://game.example.com/ws".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparseable_endpoint_invalid() {
        let mut config = Config::default();
        config.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());

        config.endpoint = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_values_invalid() {
        let mut config = Config::default();
        config.clients = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.duration_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rate = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.close_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_upper_limits() {
        let mut config = Config::default();
        config.clients = crate::defaults::MAX_CLIENTS + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rate = crate::defaults::MAX_RATE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_identity_param_invalid() {
        let mut config = Config::default();
        config.identity_param = Some("  ".to_string());
        assert!(config.validate().is_err());

        config.identity_param = None;
        assert!(config.validate().is_ok());
    }
}
