//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to create mock HTTP servers and drive the
//! worker pool end-to-end.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use pagepulse::scrape::{Fetcher, RateLimiter, WorkerPool};
use pagepulse::{is_valid_url, JobStatus, ResultEvent};
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_BODY: &str = r#"<html>
<head>
    <title>Sample Page</title>
    <meta name="description" content="A sample page" />
</head>
<body>
    <h1>Main</h1>
    <h2>First</h2>
    <h2>Second</h2>
    <a href="/one">One</a>
    <a href="/two">Two</a>
</body>
</html>"#;

/// Creates a started pool with a test fetcher and the given rate ceiling
fn build_test_pool(workers: usize, rate: u32) -> (WorkerPool, mpsc::Receiver<ResultEvent>) {
    let fetcher = Fetcher::new(5, "TestScraper/1.0").expect("Failed to build fetcher");
    let limiter = RateLimiter::new(rate).expect("Failed to build limiter");
    WorkerPool::new(workers, fetcher, limiter).expect("Failed to build pool")
}

/// Drains the result stream to completion
async fn drain(mut results: mpsc::Receiver<ResultEvent>) -> Vec<ResultEvent> {
    let mut events = Vec::new();
    while let Some(event) = results.recv().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_mixed_success_and_error_run() {
    // Start a mock server
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE_BODY)
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let url_a = format!("{}/a", mock_server.uri());
    let url_b = format!("{}/b", mock_server.uri());

    // The producer filters invalid URLs before submission
    let candidates = vec![url_a.clone(), "not-a-url".to_string(), url_b.clone()];
    let jobs: Vec<String> = candidates
        .into_iter()
        .filter(|url| is_valid_url(url))
        .collect();
    assert_eq!(jobs.len(), 2);

    let (mut pool, results) = build_test_pool(4, 100);
    pool.start();
    for url in &jobs {
        pool.add_job(url.clone()).await.unwrap();
    }
    pool.close().await.unwrap();

    let events = drain(results).await;
    let terminals: Vec<&ResultEvent> = events.iter().filter(|e| e.is_terminal()).collect();
    assert_eq!(terminals.len(), 2, "expected exactly 2 terminal events");

    let success = terminals
        .iter()
        .find(|e| e.url == url_a)
        .expect("no terminal event for the good URL");
    assert_eq!(success.status, JobStatus::Success);
    let content = success.content.as_ref().expect("success without content");
    assert_eq!(content.title, "Sample Page");
    assert_eq!(content.description, "A sample page");
    assert_eq!(content.headings.h1, vec!["Main"]);
    assert_eq!(content.headings.h2, vec!["First", "Second"]);
    assert_eq!(content.link_count, 2);

    let failure = terminals
        .iter()
        .find(|e| e.url == url_b)
        .expect("no terminal event for the failing URL");
    assert_eq!(failure.status, JobStatus::Error);
    let message = failure.error.as_ref().expect("error without message");
    assert!(
        message.contains("bad status code"),
        "unexpected error message: {}",
        message
    );
    assert!(failure.content.is_none());
}

#[tokio::test]
async fn test_every_job_yields_exactly_one_terminal_event() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE_BODY))
        .mount(&mock_server)
        .await;

    let (mut pool, results) = build_test_pool(3, 1000);
    pool.start();

    let mut urls = Vec::new();
    for i in 0..10 {
        let url = format!("{}/page{}", mock_server.uri(), i);
        pool.add_job(url.clone()).await.unwrap();
        urls.push(url);
    }
    pool.close().await.unwrap();

    let events = drain(results).await;

    // Per URL: no event may follow the terminal one, and the full sequence
    // is queued, fetching, then the terminal.
    let mut sequences: HashMap<String, Vec<JobStatus>> = HashMap::new();
    for event in &events {
        let sequence = sequences.entry(event.url.clone()).or_default();
        if let Some(last) = sequence.last() {
            assert!(
                !last.is_terminal(),
                "event after terminal for {}",
                event.url
            );
        }
        sequence.push(event.status);
    }

    assert_eq!(sequences.len(), 10);
    for url in &urls {
        let sequence = &sequences[url];
        assert_eq!(sequence.len(), 3, "unexpected sequence for {}", url);
        assert_eq!(sequence[0], JobStatus::Queued);
        assert_eq!(sequence[1], JobStatus::Fetching);
        assert!(sequence[2].is_terminal());
    }

    let terminal_total = events.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminal_total, 10);
}

#[tokio::test]
async fn test_close_joins_all_workers_before_returning() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let (mut pool, mut results) = build_test_pool(2, 1000);
    pool.start();
    for i in 0..5 {
        pool.add_job(format!("{}/p{}", mock_server.uri(), i))
            .await
            .unwrap();
    }
    pool.close().await.unwrap();

    // After close returns every worker has exited, so the whole event
    // backlog is already buffered and the stream is closed; nothing may
    // still be in flight.
    let mut events = Vec::new();
    loop {
        match results.try_recv() {
            Ok(event) => events.push(event),
            Err(mpsc::error::TryRecvError::Disconnected) => break,
            Err(mpsc::error::TryRecvError::Empty) => {
                panic!("result stream still open after close returned")
            }
        }
    }
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 5);
}

#[tokio::test]
async fn test_global_rate_ceiling_spans_all_workers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    // More workers than the rate allows to run concurrently: the ceiling
    // must still hold globally.
    let (mut pool, results) = build_test_pool(5, 10);
    pool.start();

    let start = Instant::now();
    for i in 0..5 {
        pool.add_job(format!("{}/p{}", mock_server.uri(), i))
            .await
            .unwrap();
    }
    pool.close().await.unwrap();
    let elapsed = start.elapsed();

    let events = drain(results).await;
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 5);

    // 5 admissions at 10/s need at least 4 inter-admission intervals
    assert!(
        elapsed >= Duration::from_millis(350),
        "rate gate admitted too fast: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_unreachable_host_yields_a_single_error_event() {
    let (mut pool, results) = build_test_pool(1, 100);
    pool.start();

    // Port 9 (discard) is not listening
    pool.add_job("http://127.0.0.1:9/").await.unwrap();
    pool.close().await.unwrap();

    let events = drain(results).await;
    let terminals: Vec<&ResultEvent> = events.iter().filter(|e| e.is_terminal()).collect();
    assert_eq!(terminals.len(), 1);
    assert_eq!(terminals[0].status, JobStatus::Error);
    assert!(terminals[0].error.is_some());
}
