//! Rolling-window rate limiter for outbound Red List requests.
//!
//! Callers that find the window full are suspended until the oldest slot
//! leaves it. Nothing is ever rejected: the limiter only delays.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Default number of calls allowed per window.
pub const DEFAULT_MAX_REQUESTS: usize = 10;

/// Default window length.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

/// Rolling-window rate limiter.
///
/// Keeps the start times of the calls made in the last `period` in a
/// `VecDeque` behind a tokio Mutex.
pub struct RateLimiter {
    slots: Mutex<VecDeque<Instant>>,
    max_requests: usize,
    period: Duration,
    tracker: RequestTracker,
}

impl RateLimiter {
    /// Creates a limiter allowing `max_requests` calls per `period`.
    /// A budget of zero is raised to one. A zero period would never hold a
    /// slot, so it is replaced by [`DEFAULT_PERIOD`].
    pub fn new(max_requests: usize, period: Duration) -> Self {
        let max_requests = max_requests.max(1);
        let period = if period.is_zero() { DEFAULT_PERIOD } else { period };
        Self {
            slots: Mutex::new(VecDeque::with_capacity(max_requests)),
            max_requests,
            period,
            tracker: RequestTracker::new(),
        }
    }

    /// Waits until a slot is free, then claims it.
    ///
    /// The lock is released while sleeping so other callers can observe the
    /// window; after waking the window is re-checked.
    pub async fn acquire(&self) {
        loop {
            let now = Instant::now();
            let mut slots = self.slots.lock().await;
            evict_expired(&mut slots, now, self.period);

            if slots.len() < self.max_requests {
                slots.push_back(now);
                return;
            }

            let wait = match slots.front() {
                Some(&oldest) => (oldest + self.period).saturating_duration_since(now),
                None => Duration::ZERO,
            };
            drop(slots);

            tracing::debug!("Rate limit reached, waiting {:?}", wait);
            self.tracker.record_wait(wait);
            sleep(wait).await;
        }
    }

    /// Non-blocking snapshot of the calls still available in the current window.
    ///
    /// Returns `None` if the lock is contended.
    pub fn remaining_budget(&self) -> Option<usize> {
        let slots = self.slots.try_lock().ok()?;
        let now = Instant::now();
        let active = slots
            .iter()
            .filter(|&&t| now.saturating_duration_since(t) < self.period)
            .count();
        Some(self.max_requests.saturating_sub(active))
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// The configured calls per window.
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// The configured window length.
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_PERIOD)
    }
}

fn evict_expired(slots: &mut VecDeque<Instant>, now: Instant, period: Duration) {
    while slots
        .front()
        .is_some_and(|&t| now.saturating_duration_since(t) >= period)
    {
        slots.pop_front();
    }
}

/// Atomic counters for requests that went through the limiter.
pub struct RequestTracker {
    requests_made: AtomicU64,
    requests_succeeded: AtomicU64,
    requests_failed: AtomicU64,
    waits: AtomicU64,
    /// Cumulative wait time in milliseconds.
    total_wait_ms: AtomicU64,
}

impl RequestTracker {
    fn new() -> Self {
        Self {
            requests_made: AtomicU64::new(0),
            requests_succeeded: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            waits: AtomicU64::new(0),
            total_wait_ms: AtomicU64::new(0),
        }
    }

    pub fn record_success(&self) {
        self.requests_made.fetch_add(1, Ordering::Relaxed);
        self.requests_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.requests_made.fetch_add(1, Ordering::Relaxed);
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_wait(&self, duration: Duration) {
        self.waits.fetch_add(1, Ordering::Relaxed);
        self.total_wait_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Snapshot the current counters.
    pub fn summary(&self) -> TrackerSummary {
        TrackerSummary {
            requests_made: self.requests_made.load(Ordering::Relaxed),
            requests_succeeded: self.requests_succeeded.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            waits: self.waits.load(Ordering::Relaxed),
            total_wait_secs: self.total_wait_ms.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}

/// Immutable snapshot of tracker counters for display.
#[derive(Debug, Clone)]
pub struct TrackerSummary {
    pub requests_made: u64,
    pub requests_succeeded: u64,
    pub requests_failed: u64,
    pub waits: u64,
    pub total_wait_secs: f64,
}
