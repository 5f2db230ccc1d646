//! Error handling for the game load tester

use thiserror::Error;

/// Custom error types for the game load tester
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parsing errors (URLs, JSON, numbers)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Endpoint host could not be resolved
    #[error("DNS resolution error: {0}")]
    DnsResolution(String),

    /// Connection-level failure while connecting, sending or receiving
    #[error("Transport error: {0}")]
    Transport(String),

    /// Decode attempted on a zero-length inbound frame
    #[error("Empty payload: inbound frame has no kind tag")]
    EmptyPayload,
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new DNS resolution error
    pub fn dns_resolution<S: Into<String>>(message: S) -> Self {
        Self::DnsResolution(message.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Parse(_) => "PARSE",
            Self::Io(_) => "IO",
            Self::DnsResolution(_) => "DNS",
            Self::Transport(_) => "TRANSPORT",
            Self::EmptyPayload => "DECODE",
        }
    }

    /// Check if the error only affects a single message or connection.
    ///
    /// Recoverable errors are absorbed by the worker that hit them and show up
    /// in the aggregate error count; they never abort the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::EmptyPayload => true,
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) | Self::DnsResolution(_) | Self::Io(_) => false,
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,  // Invalid configuration/usage
            Self::DnsResolution(_) | Self::Transport(_) => 2,  // Network issues
            Self::Io(_) => 5,
            Self::EmptyPayload => 6,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::DnsResolution(_) | Self::Transport(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) | Self::EmptyPayload => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for AppError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::transport(error.to_string())
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_error = AppError::config("Invalid configuration");
        assert_eq!(config_error.category(), "CONFIG");
        assert!(!config_error.is_recoverable());
        assert_eq!(config_error.exit_code(), 1);

        let transport_error = AppError::transport("Connection reset");
        assert_eq!(transport_error.category(), "TRANSPORT");
        assert!(transport_error.is_recoverable());
        assert_eq!(transport_error.exit_code(), 2);
    }

    #[test]
    fn test_empty_payload_is_distinct() {
        let error = AppError::EmptyPayload;
        assert_eq!(error.category(), "DECODE");
        assert!(error.is_recoverable());
        assert!(error.to_string().contains("Empty payload"));
    }

    #[test]
    fn test_error_categories() {
        let errors = [
            AppError::config("config"),
            AppError::validation("validation"),
            AppError::parse("parse"),
            AppError::io("io"),
            AppError::dns_resolution("dns"),
            AppError::transport("transport"),
            AppError::EmptyPayload,
        ];

        let expected_categories = [
            "CONFIG", "VALIDATION", "PARSE", "IO", "DNS",
            "TRANSPORT", "DECODE",
        ];

        for (error, expected) in errors.iter().zip(expected_categories.iter()) {
            assert_eq!(error.category(), *expected);
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("test").exit_code(), 1);
        assert_eq!(AppError::validation("test").exit_code(), 1);
        assert_eq!(AppError::dns_resolution("test").exit_code(), 2);
        assert_eq!(AppError::io("test").exit_code(), 5);
        assert_eq!(AppError::EmptyPayload.exit_code(), 6);
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");

        let parse_error = "not_a_number".parse::<u32>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");

        let url_error = url::Url::parse("not a url").unwrap_err();
        let app_error: AppError = url_error.into();
        assert!(app_error.to_string().contains("URL parse error"));
    }

    #[test]
    fn test_tungstenite_error_conversion() {
        let ws_error = tokio_tungstenite::tungstenite::Error::ConnectionClosed;
        let app_error: AppError = ws_error.into();
        assert_eq!(app_error.category(), "TRANSPORT");
        assert!(app_error.is_recoverable());
    }

    #[test]
    fn test_dotenv_error_conversion() {
        let dotenv_error = dotenv::Error::LineParse(".env".to_string(), 1);
        let app_error: AppError = dotenv_error.into();
        assert_eq!(app_error.category(), "CONFIG");
        assert!(app_error.to_string().contains("Environment file error"));
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::config("Test error");
        let formatted_no_color = error.format_for_console(false);
        let formatted_color = error.format_for_console(true);

        assert_eq!(formatted_no_color, "[CONFIG] Configuration error: Test error");
        assert!(formatted_color.contains("CONFIG"));
        assert!(formatted_color.contains("Test error"));
    }
}
