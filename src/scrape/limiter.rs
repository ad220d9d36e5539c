//! Global request admission gate
//!
//! All workers contend for one ticking interval, so the request ceiling
//! holds across the whole pool regardless of worker count.

use crate::ConfigError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{self, Interval, MissedTickBehavior};

/// Shared admission gate releasing one slot every `1/R` seconds.
///
/// The first acquisition is admitted immediately; every later one waits for
/// its tick. The underlying timer is released when the limiter is dropped,
/// which also makes acquire-after-stop unrepresentable.
pub struct RateLimiter {
    interval: Mutex<Interval>,
}

impl RateLimiter {
    /// Creates a gate admitting at most `per_second` requests per second.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `per_second` is zero.
    pub fn new(per_second: u32) -> Result<Self, ConfigError> {
        if per_second == 0 {
            return Err(ConfigError::Validation(
                "rate limit must be at least 1 request per second".to_string(),
            ));
        }

        let mut interval = time::interval(Duration::from_secs(1) / per_second);
        // Back-pressure must not turn into a burst of admissions later.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Ok(Self {
            interval: Mutex::new(interval),
        })
    }

    /// Blocks the calling worker until it may issue a request.
    ///
    /// Safe to call from any number of workers concurrently; each waiter
    /// consumes exactly one tick.
    pub async fn acquire(&self) {
        self.interval.lock().await.tick().await;
    }
}
