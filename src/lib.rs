//! PagePulse: a concurrent page scraper with a live result feed
//!
//! This crate fetches a fixed list of URLs through a bounded worker pool,
//! extracts structured fields from each page, and emits the results both as
//! durable JSON/CSV output and as a live event stream for websocket
//! subscribers.

pub mod config;
pub mod model;
pub mod output;
pub mod scrape;
pub mod server;
pub mod url;

use thiserror::Error;

/// Main error type for PagePulse operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] scrape::FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] scrape::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Job queue is closed")]
    QueueClosed,

    #[error("Tokio join error, couldn't await a worker: {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for PagePulse operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{JobStatus, PageContent, ResultEvent, ScrapeJob};
pub use scrape::{parse_page, Fetcher, RateLimiter, WorkerPool};
pub use self::url::is_valid_url;
