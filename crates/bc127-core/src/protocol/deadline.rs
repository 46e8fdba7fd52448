//! Exchange deadlines
//!
//! Every exchange loop races a wall-clock deadline computed from the
//! transport's monotonic clock. There is no other cancellation signal.

use std::time::{Duration, Instant};

/// A (start instant, duration) pair answering "has this operation run out
/// of time?".
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    /// A deadline of `limit` beginning at `start`.
    pub fn starting_at(start: Instant, limit: Duration) -> Self {
        Self { start, limit }
    }

    /// True once `limit` has elapsed since the start instant.
    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.start) >= self.limit
    }
}
