use std::time::{Duration, Instant};

/// Fixed-interval tick clock for a single cooperative loop.
///
/// The caller polls [`Ticker::due`] and runs one tick per `true`; the next
/// deadline is measured from the moment the tick was taken, so a slow tick
/// never causes two to run back to back.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    interval: Duration,
    last_tick: Instant,
}

impl Ticker {
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    /// Returns true and rearms the clock when a tick is due at `now`.
    pub fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) < self.interval {
            return false;
        }
        self.last_tick = now;
        true
    }

    /// Time left until the next tick; zero when one is already due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }
}
