//! Scrape pipeline: rate gate, fetcher, parser, and the worker pool
//!
//! This module contains the concurrent core of PagePulse:
//! - A global admission gate bounding request throughput
//! - HTTP fetching with timeout and status checking
//! - HTML field extraction
//! - The worker pool that drives fetch-then-parse per job and emits
//!   incremental result events

mod fetcher;
mod limiter;
mod parser;
mod pool;

pub use fetcher::{FetchError, FetchedPage, Fetcher};
pub use limiter::RateLimiter;
pub use parser::{parse_page, ParseError};
pub use pool::WorkerPool;

use crate::config::ScraperConfig;
use crate::model::ResultEvent;
use crate::ScrapeError;
use tokio::sync::mpsc;

/// Builds a ready-to-start worker pool from scraper configuration.
///
/// Constructs the HTTP client, the rate gate, and the pool in one step and
/// returns the pool together with its result stream.
///
/// # Errors
///
/// Returns an error if the configuration is invalid (zero workers or rate)
/// or the HTTP client cannot be built.
pub fn build_pool(
    config: &ScraperConfig,
) -> Result<(WorkerPool, mpsc::Receiver<ResultEvent>), ScrapeError> {
    let fetcher = Fetcher::new(config.timeout_secs, &config.user_agent)?;
    let limiter = RateLimiter::new(config.rate_limit_per_sec)?;
    let (pool, results) = WorkerPool::new(config.worker_count, fetcher, limiter)?;
    Ok((pool, results))
}
