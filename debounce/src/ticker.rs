use crate::{non_zero, ConfigError, Duration, Instant};

/// Fixed-rate schedule for the polling loop.
///
/// Ticks that were missed while the loop was busy are skipped rather than
/// replayed back to back, so debouncers never see a burst of samples with
/// the same timestamp.
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(period: Duration, start: Instant) -> Result<Self, ConfigError> {
        Ok(Self {
            period: non_zero(period, "tick_period")?,
            next: start,
        })
    }

    /// Returns true if a tick is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        while self.next <= now {
            self.next = self.next + self.period;
        }
        true
    }

    pub fn next(&self) -> Instant {
        self.next
    }
}
