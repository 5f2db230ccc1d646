//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    models::Config,
    error::Result,
    config::env::EnvManager,
};
use std::path::{Path, PathBuf};

/// Configuration parser that layers defaults, `.env`, environment and CLI
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    /// Create a new configuration parser reading `.env` from the working directory
    pub fn new(cli: Cli) -> Self {
        Self::with_env_file(cli, ".env")
    }

    /// Create a parser reading the given env file instead of `.env`
    pub fn with_env_file<P: AsRef<Path>>(cli: Cli, env_file: P) -> Self {
        Self {
            cli,
            env_file: env_file.as_ref().to_path_buf(),
        }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        // Values already present in the environment win over the file
        EnvManager::load_env_file_from(&self.env_file, self.cli.debug)?;

        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref endpoint) = self.cli.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(clients) = self.cli.clients {
            config.clients = clients;
        }
        if let Some(duration) = self.cli.duration {
            config.duration_secs = duration;
        }
        if let Some(rate) = self.cli.rate {
            config.rate = rate;
        }
        if let Some(timeout) = self.cli.close_timeout {
            config.close_timeout_ms = timeout;
        }

        if self.cli.no_identity {
            config.identity_param = None;
        } else if let Some(ref param) = self.cli.identity_param {
            config.identity_param = Some(param.clone());
        }

        if let Some(enable_color) = self.cli.color_override() {
            config.enable_color = enable_color;
        }
        if let Some(format) = self.cli.log_format {
            config.log_format = format;
        }

        // CLI-only flags
        config.json_output = self.cli.json;
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!(
                "Final config: endpoint={}, clients={}, duration={}s, rate={}/s",
                config.endpoint, config.clients, config.duration_secs, config.rate
            );
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Endpoint: {}", config.endpoint));
    summary.push(format!("Clients: {}", config.clients));
    summary.push(format!("Duration: {}s", config.duration_secs));
    summary.push(format!("Rate: {} msg/s per kind", config.rate));
    summary.push(format!(
        "Identity Parameter: {}",
        config.identity_param.as_deref().unwrap_or("disabled")
    ));
    summary.push(format!("Close Timeout: {}ms", config.close_timeout_ms));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("JSON Report: {}", config.json_output));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use clap::Parser;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// Serializes tests that touch process environment variables
    pub(crate) static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for (name, _, _) in EnvManager::get_supported_env_vars() {
            env::remove_var(name);
        }
    }

    fn parse_without_env_file(args: &[&str]) -> Result<Config> {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from(args);
        ConfigParser::with_env_file(cli, dir.path().join(".env")).parse()
    }

    #[test]
    fn test_config_parser_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = parse_without_env_file(&["glt"]).unwrap();
        assert_eq!(config.endpoint, crate::defaults::DEFAULT_ENDPOINT);
        assert_eq!(config.clients, crate::defaults::DEFAULT_CLIENTS_COUNT);
        assert_eq!(config.rate, crate::defaults::DEFAULT_MESSAGE_RATE);
        assert_eq!(config.identity_param.as_deref(), Some("name"));
        assert!(!config.json_output);
    }

    #[test]
    fn test_cli_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = parse_without_env_file(&[
            "glt", "--endpoint", "ws://10.1.1.1:7000", "--clients", "3", "--duration", "2",
            "--rate", "5", "--no-identity", "--no-color", "--json", "--log-format", "json", "--verbose",
        ])
        .unwrap();

        assert_eq!(config.endpoint, "ws://10.1.1.1:7000");
        assert_eq!(config.clients, 3);
        assert_eq!(config.duration_secs, 2);
        assert_eq!(config.rate, 5);
        assert!(config.identity_param.is_none());
        assert!(!config.enable_color);
        assert!(config.json_output);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.verbose);
    }

    #[test]
    fn test_cli_overrides_env_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("CLIENTS_COUNT", "8");
        env::set_var("MESSAGE_RATE", "4");

        let config = parse_without_env_file(&["glt", "--clients", "12"]).unwrap();
        clear_env();

        assert_eq!(config.clients, 12);
        assert_eq!(config.rate, 4);
    }

    #[test]
    fn test_env_file_layer() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TARGET_ENDPOINT=ws://192.168.1.20:8080/").unwrap();
        writeln!(file, "TEST_DURATION_SEC=15").unwrap();
        writeln!(file, "IDENTITY_PARAM=player").unwrap();

        let cli = Cli::parse_from(["glt", "--duration", "9"]);
        let config = ConfigParser::with_env_file(cli, file.path()).parse();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.endpoint, "ws://192.168.1.20:8080/");
        assert_eq!(config.duration_secs, 9);
        assert_eq!(config.identity_param.as_deref(), Some("player"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let err = parse_without_env_file(&["glt", "--clients", "0"]).unwrap_err();
        assert_eq!(err.exit_code(), 1);

        env::set_var("MESSAGE_RATE", "fast");
        let result = parse_without_env_file(&["glt"]);
        clear_env();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_summary() {
        let config = Config::default();
        let summary = display_config_summary(&config);

        assert!(summary.contains("Endpoint: ws://127.0.0.1:8080"));
        assert!(summary.contains("Clients:"));
        assert!(summary.contains("Identity Parameter: name"));
        assert!(summary.contains("Close Timeout: 1000ms"));
    }
}
