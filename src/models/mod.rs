//! Data models and structures for the game load tester

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::Config;
pub use metrics::{KindSummary, RunReport};
