//! Token-bucket rate limiting for batched writes.
//!
//! The bucket is pure: callers pass the current [`Instant`] in, so tests can
//! step time deterministically and the async sleep lives with the caller.

use std::time::{Duration, Instant};

/// A token bucket refilling continuously at `refill_per_sec`.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket. A zero capacity is raised to one token.
    pub fn new(capacity: u32, refill_per_sec: f64, now: Instant) -> Self {
        let capacity = f64::from(capacity.max(1));
        Self {
            capacity,
            refill_per_sec: refill_per_sec.max(0.0),
            tokens: capacity,
            last_refill: now,
        }
    }

    /// Bucket that allows `batch_size` writes, then one batch per `pause`.
    pub fn for_batches(batch_size: u32, pause: Duration, now: Instant) -> Self {
        let secs = pause.as_secs_f64();
        let refill = if secs > 0.0 {
            f64::from(batch_size.max(1)) / secs
        } else {
            f64::INFINITY
        };
        Self::new(batch_size, refill, now)
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }

    /// Take one token if available.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// How long until a token will be available. Zero when one is ready now.
    pub fn wait_time(&mut self, now: Instant) -> Duration {
        self.refill(now);
        if self.tokens >= 1.0 {
            return Duration::ZERO;
        }
        if self.refill_per_sec <= 0.0 {
            return Duration::MAX;
        }
        Duration::from_secs_f64((1.0 - self.tokens) / self.refill_per_sec)
    }

    pub fn available(&self) -> f64 {
        self.tokens
    }
}
