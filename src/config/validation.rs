//! Configuration validation utilities and rules

use crate::{
    models::Config,
    error::Result,
};
use url::Host;

/// Total outbound messages per second above which a run is flagged
pub const HIGH_TOTAL_RATE: u64 = 50_000;

/// Clients per logical core above which a run is flagged
pub const CLIENTS_PER_CORE: u64 = 2_000;

/// Configuration validator with advisory rules on top of `Config::validate`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration and collect non-fatal warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_endpoint(config)?);
        warnings.extend(Self::validate_load_settings(config, num_cpus::get()));

        Ok(warnings)
    }

    fn validate_endpoint(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        let url = config.endpoint_url()?;

        let local = match url.host() {
            Some(Host::Ipv4(ip)) => ip.is_loopback() || ip.is_private(),
            Some(Host::Ipv6(ip)) => ip.is_loopback(),
            Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
            None => false,
        };
        if !local {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Endpoint '{}' is not a local address; make sure you are allowed to load it", config.endpoint),
            ));
        }

        if url.query().is_some() && config.identity_param.is_some() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Endpoint '{}' already has a query; the identity parameter is appended to it", config.endpoint),
            ));
        }

        Ok(warnings)
    }

    /// Rules on the shape of the generated load
    pub fn validate_load_settings(config: &Config, cpu_cores: usize) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        // Each tick sends one Move and one State request
        let total_rate = u64::from(config.clients) * u64::from(config.rate) * 2;
        if total_rate > HIGH_TOTAL_RATE {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Configuration will send about {} messages per second in total", total_rate),
            ));
        }

        let core_budget = cpu_cores.max(1) as u64 * CLIENTS_PER_CORE;
        if u64::from(config.clients) > core_budget {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "{} clients on {} cores may saturate this machine before the server",
                    config.clients, cpu_cores
                ),
            ));
        }

        if config.duration_secs < 5 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Run of {}s is dominated by connection setup", config.duration_secs),
            ));
        }

        if config.close_timeout_ms < 100 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Close timeout of {}ms may cut close handshakes short", config.close_timeout_ms),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> &'static str {
        match self {
            Self::Info => "blue",
            Self::Warning => "yellow",
            Self::Error => "red",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        use colored::Colorize;

        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
