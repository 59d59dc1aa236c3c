use std::time::{Duration, Instant};

/// Fixed-cadence deadline source.
///
/// The first deadline is the start instant itself, so a freshly started loop
/// runs its first iteration immediately. A late wake-up schedules the next
/// deadline one interval from "now" instead of replaying missed ticks.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
    index: u64,
}

impl Ticker {
    /// Shortest accepted interval. A zero interval would spin the event loop.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval: interval.max(Self::MIN_INTERVAL),
            next: start,
            index: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Instant at which the next tick is due.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Number of ticks consumed so far.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Consumes the current tick and returns the following deadline.
    pub fn advance(&mut self, now: Instant) -> Instant {
        self.index = self.index.wrapping_add(1);
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        self.next
    }
}
