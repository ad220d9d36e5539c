//! HTTP fetcher
//!
//! One GET per job through a shared client with a total request timeout and
//! an identifying User-Agent header. Non-2xx responses are rejected without
//! reading the body. Retry policy belongs to the caller; none is applied
//! here.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors a single fetch can produce
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out for {url}")]
    Timeout { url: String },

    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("bad status code {status} for {url}")]
    BadStatus { url: String, status: u16 },
}

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code (always in the 200-299 range)
    pub status: u16,

    /// Response body
    pub body: String,
}

/// HTTP fetcher wrapping a configured client
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher with the given total timeout and User-Agent header.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Performs one GET request.
    ///
    /// # Errors
    ///
    /// * [`FetchError::Timeout`] - the deadline elapsed
    /// * [`FetchError::Transport`] - DNS, connection, or protocol failure
    /// * [`FetchError::BadStatus`] - response status outside 200-299; the
    ///   body is dropped unread
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            // The response is dropped here without the body being read.
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
