//! Live event fan-out
//!
//! The hub is a downstream consumer of the result stream, never a
//! dependency of the pool. Subscribers get their own buffered channel; a
//! subscriber whose buffer is full is dropped rather than allowed to block
//! publishing.

use crate::model::ResultEvent;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Events buffered per subscriber before it is considered too slow
const SUBSCRIBER_BUFFER: usize = 64;

/// Registry of live event subscribers.
///
/// `register`/`unregister`/`publish` serialize on one internal lock that is
/// disjoint from all pool internals.
#[derive(Debug, Default)]
pub struct EventHub {
    subscribers: Mutex<HashMap<u64, mpsc::Sender<ResultEvent>>>,
    next_id: AtomicU64,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber and returns its id plus the receiving end of its
    /// event channel. The channel ends when the subscriber is dropped for
    /// falling behind.
    pub fn register(&self) -> (u64, mpsc::Receiver<ResultEvent>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        self.subscribers.lock().unwrap().insert(id, tx);
        tracing::debug!(subscriber = id, "subscriber registered");
        (id, rx)
    }

    /// Removes a subscriber. Removing an unknown id is a no-op.
    pub fn unregister(&self, id: u64) {
        if self.subscribers.lock().unwrap().remove(&id).is_some() {
            tracing::debug!(subscriber = id, "subscriber unregistered");
        }
    }

    /// Forwards one event to every subscriber without blocking.
    ///
    /// Subscribers that have disconnected or whose buffer is full are
    /// removed from the registry.
    pub fn publish(&self, event: &ResultEvent) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|id, tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(subscriber = id, "dropping subscriber that cannot keep up");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        });
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}
