//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env from the working directory if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load the given env file if it exists. Variables already set are kept.
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Game Load Tester Configuration
#
# Values specified here are used as defaults and can be overridden by
# environment variables and command-line arguments.

# WebSocket endpoint of the game server
# TARGET_ENDPOINT=ws://127.0.0.1:8080

# Number of concurrent simulated clients
# CLIENTS_COUNT=100

# Test duration in seconds
# TEST_DURATION_SEC=30

# Messages per second, per client, per message kind
# MESSAGE_RATE=10

# Query parameter carrying the random client identity (empty to disable)
# IDENTITY_PARAM=name

# Close handshake grace timeout in milliseconds
# CLOSE_TIMEOUT_MS=1000

# Enable colored output (true/false)
# ENABLE_COLOR=true
"#.to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("TARGET_ENDPOINT", "WebSocket endpoint of the game server", "ws://127.0.0.1:8080"),
            ("CLIENTS_COUNT", "Number of concurrent clients (1-100000)", "100"),
            ("TEST_DURATION_SEC", "Test duration in seconds (1-86400)", "30"),
            ("MESSAGE_RATE", "Messages per second per client and kind (1-1000)", "10"),
            ("IDENTITY_PARAM", "Identity query parameter, empty to disable", "name"),
            ("CLOSE_TIMEOUT_MS", "Close handshake grace timeout (1-60000 ms)", "1000"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }
}
