//! Core data model: jobs, extracted page content, and result events
//!
//! A [`ScrapeJob`] is one URL queued for processing. Workers report progress
//! through immutable [`ResultEvent`]s: per URL, zero or more progress events
//! (`queued`, `fetching`) followed by exactly one terminal event (`success`
//! or `error`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One URL queued for processing.
///
/// Jobs are owned by the job queue until claimed by exactly one worker; the
/// producer keeps no reference after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeJob {
    /// Target URL (non-empty, validated by the producer)
    pub url: String,
}

impl ScrapeJob {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Progress status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Fetching,
    Success,
    Error,
}

impl JobStatus {
    /// Returns true for the statuses that end a job's event sequence
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Fetching => "fetching",
            JobStatus::Success => "success",
            JobStatus::Error => "error",
        }
    }
}

/// Heading text collected in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
}

/// Structured fields extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Text of the first `<title>` element, trimmed; empty if absent
    pub title: String,

    /// `content` attribute of the description meta tag; empty if absent
    pub description: String,

    /// H1 and H2 text in document order
    pub headings: Headings,

    /// Total number of anchor elements on the page
    #[serde(rename = "links")]
    pub link_count: usize,
}

/// An immutable observation of one job's progress or outcome.
///
/// The extracted `content` is present only on `success`, the `error` message
/// only on `error`. Content fields are flattened so the serialized form is
/// one flat record per event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEvent {
    pub url: String,
    pub status: JobStatus,
    pub scraped_at: DateTime<Utc>,

    #[serde(flatten)]
    pub content: Option<PageContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEvent {
    /// Progress event: the job has been claimed by a worker
    pub fn queued(url: &str) -> Self {
        Self::progress(url, JobStatus::Queued)
    }

    /// Progress event: the worker is about to fetch the page
    pub fn fetching(url: &str) -> Self {
        Self::progress(url, JobStatus::Fetching)
    }

    /// Terminal event carrying the extracted fields
    pub fn success(url: &str, content: PageContent) -> Self {
        Self {
            url: url.to_string(),
            status: JobStatus::Success,
            scraped_at: Utc::now(),
            content: Some(content),
            error: None,
        }
    }

    /// Terminal event carrying the failure message
    pub fn failure(url: &str, message: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            status: JobStatus::Error,
            scraped_at: Utc::now(),
            content: None,
            error: Some(message.into()),
        }
    }

    fn progress(url: &str, status: JobStatus) -> Self {
        Self {
            url: url.to_string(),
            status,
            scraped_at: Utc::now(),
            content: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_content() -> PageContent {
        PageContent {
            title: "Example".to_string(),
            description: "An example page".to_string(),
            headings: Headings {
                h1: vec!["Main".to_string()],
                h2: vec!["First".to_string(), "Second".to_string()],
            },
            link_count: 7,
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Fetching.is_terminal());
        assert!(JobStatus::Success.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }

    #[test]
    fn test_success_event_serializes_flat() {
        let event = ResultEvent::success("https://example.com/", sample_content());
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["url"], "https://example.com/");
        assert_eq!(value["status"], "success");
        assert_eq!(value["title"], "Example");
        assert_eq!(value["links"], 7);
        assert_eq!(value["headings"]["h2"][1], "Second");
        // No error key on success records
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_event_serialization() {
        let event = ResultEvent::failure("https://fail.test/", "bad status code: 500");
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "bad status code: 500");
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_event_round_trip() {
        let event = ResultEvent::success("https://example.com/", sample_content());
        let json = serde_json::to_string(&event).unwrap();
        let back: ResultEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(back.url, event.url);
        assert_eq!(back.status, JobStatus::Success);
        assert_eq!(back.content, event.content);
        assert_eq!(back.error, None);
    }

    #[test]
    fn test_error_event_round_trip_has_no_content() {
        let event = ResultEvent::failure("https://fail.test/", "request timed out");
        let json = serde_json::to_string(&event).unwrap();
        let back: ResultEvent = serde_json::from_str(&json).unwrap();

        assert!(back.content.is_none());
        assert_eq!(back.error.as_deref(), Some("request timed out"));
    }
}
