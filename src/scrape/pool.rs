//! Worker pool driving the concurrent fetch/parse pipeline
//!
//! A fixed number of workers pull jobs from a shared bounded queue, pass the
//! global rate gate, fetch, parse, and push result events onto a bounded
//! result queue. A full result queue blocks the producing worker, which in
//! turn throttles fetch throughput; that back-pressure is intentional.
//!
//! Per job the event sequence on the result stream is `queued`, `fetching`,
//! then exactly one terminal `success` or `error`. Events of different jobs
//! interleave arbitrarily; only the per-URL order is guaranteed.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::model::{ResultEvent, ScrapeJob};
use crate::scrape::{parse_page, Fetcher, RateLimiter};
use crate::{ConfigError, ScrapeError};

/// Capacity of both the job queue and the result queue
const QUEUE_CAPACITY: usize = 100;

/// Fixed-size pool of scrape workers.
///
/// Lifecycle: [`WorkerPool::new`] validates and constructs,
/// [`WorkerPool::start`] spawns the workers, [`WorkerPool::close`] consumes
/// the pool, stops new submissions, waits for in-flight jobs to drain, and
/// joins every worker. Because `close` takes the pool by value, submitting
/// after close does not compile; a closed pool cannot be reused.
pub struct WorkerPool {
    worker_count: usize,
    job_tx: mpsc::Sender<ScrapeJob>,
    job_rx: Option<mpsc::Receiver<ScrapeJob>>,
    result_tx: Option<mpsc::Sender<ResultEvent>>,
    fetcher: Arc<Fetcher>,
    limiter: Arc<RateLimiter>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Creates a pool together with the receiving end of its result stream.
    ///
    /// The result stream yields events while the pool runs and ends once the
    /// pool has been closed and fully drained.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `worker_count` is zero.
    pub fn new(
        worker_count: usize,
        fetcher: Fetcher,
        limiter: RateLimiter,
    ) -> Result<(Self, mpsc::Receiver<ResultEvent>), ConfigError> {
        if worker_count == 0 {
            return Err(ConfigError::Validation(
                "worker count must be at least 1".to_string(),
            ));
        }

        let (job_tx, job_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (result_tx, result_rx) = mpsc::channel(QUEUE_CAPACITY);

        let pool = Self {
            worker_count,
            job_tx,
            job_rx: Some(job_rx),
            result_tx: Some(result_tx),
            fetcher: Arc::new(fetcher),
            limiter: Arc::new(limiter),
            handles: Vec::new(),
        };

        Ok((pool, result_rx))
    }

    /// Spawns the worker tasks. Calling `start` a second time is a no-op.
    pub fn start(&mut self) {
        let (Some(job_rx), Some(result_tx)) = (self.job_rx.take(), self.result_tx.take()) else {
            return;
        };

        let job_rx = Arc::new(Mutex::new(job_rx));
        for id in 0..self.worker_count {
            self.handles.push(tokio::spawn(worker_loop(
                id,
                Arc::clone(&job_rx),
                result_tx.clone(),
                Arc::clone(&self.fetcher),
                Arc::clone(&self.limiter),
            )));
        }
        // The pool's own result_tx clone drops here; the result stream
        // closes once the last worker exits.
    }

    /// Enqueues one job.
    ///
    /// Blocks while the job queue is full.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::QueueClosed`] if every worker has already exited,
    /// which only happens after a consumer-side failure.
    pub async fn add_job(&self, url: impl Into<String>) -> Result<(), ScrapeError> {
        self.job_tx
            .send(ScrapeJob::new(url))
            .await
            .map_err(|_| ScrapeError::QueueClosed)
    }

    /// Closes the job queue, drains in-flight jobs, and joins all workers.
    ///
    /// Returns only after every worker has exited, at which point the result
    /// stream is closed as well.
    pub async fn close(self) -> Result<(), ScrapeError> {
        let Self {
            job_tx,
            job_rx,
            result_tx,
            handles,
            ..
        } = self;

        // Closing the queue is what tells workers to finish and exit.
        drop(job_tx);
        drop(job_rx);
        drop(result_tx);

        for handle in handles {
            handle.await?;
        }

        Ok(())
    }
}

/// One worker: pull a job, report progress, gate, fetch, parse, report the
/// terminal outcome, repeat until the job queue is closed and drained.
async fn worker_loop(
    id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<ScrapeJob>>>,
    results: mpsc::Sender<ResultEvent>,
    fetcher: Arc<Fetcher>,
    limiter: Arc<RateLimiter>,
) {
    tracing::debug!(worker = id, "worker started");

    loop {
        // Hold the queue lock only while dequeuing, not while processing.
        let job = { jobs.lock().await.recv().await };
        let Some(job) = job else {
            break;
        };

        // A failed send means the result consumer is gone; there is nobody
        // left to report to, so the worker stops.
        if results.send(ResultEvent::queued(&job.url)).await.is_err() {
            break;
        }
        if results.send(ResultEvent::fetching(&job.url)).await.is_err() {
            break;
        }

        limiter.acquire().await;
        tracing::debug!(worker = id, url = %job.url, "fetching");

        let event = match fetcher.fetch(&job.url).await {
            Ok(page) => match parse_page(&job.url, &page.body) {
                Ok(content) => ResultEvent::success(&job.url, content),
                Err(e) => {
                    tracing::warn!(worker = id, url = %job.url, error = %e, "failed to parse");
                    ResultEvent::failure(&job.url, e.to_string())
                }
            },
            Err(e) => {
                tracing::warn!(worker = id, url = %job.url, error = %e, "failed to fetch");
                ResultEvent::failure(&job.url, e.to_string())
            }
        };

        if results.send(event).await.is_err() {
            break;
        }
    }

    tracing::debug!(worker = id, "worker exiting");
}
