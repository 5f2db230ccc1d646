//! Game Load Tester
//!
//! A load generator for binary-protocol real-time game servers reached over
//! WebSocket. It opens many concurrent persistent connections, emits
//! synthetic Move and State traffic at a fixed rate per connection, and
//! aggregates throughput, latency and error statistics into one report.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod protocol;
pub mod stats;
pub mod types;
pub mod worker;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use executor::{LoadExecutor, LoadTestExecutor};
pub use models::{Config, KindSummary, RunReport};
pub use output::{ColoredFormatter, JsonFormatter, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use stats::{StatsAggregator, StatsSnapshot};
pub use worker::{ConnectionWorker, WorkerConfig, WorkerHandle};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8080";
    pub const DEFAULT_CLIENTS_COUNT: u32 = 100;
    pub const DEFAULT_TEST_DURATION: Duration = Duration::from_secs(30);
    pub const DEFAULT_MESSAGE_RATE: u32 = 10;
    pub const DEFAULT_IDENTITY_PARAM: &str = "name";
    pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_millis(1000);
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    pub const MAX_CLIENTS: u32 = 100_000;
    pub const MAX_DURATION_SECS: u64 = 86_400;
    pub const MAX_RATE: u32 = 1000;
    pub const MAX_CLOSE_TIMEOUT_MS: u64 = 60_000;
}
