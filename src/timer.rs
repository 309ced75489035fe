use std::time::{Duration, Instant};

/// The periodic tick as an explicit scheduled task. Only one deadline is ever
/// pending; starting again replaces it and cancelling drops it.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        TickTimer { interval, next_due: None }
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.next_due, Some(due) if now >= due)
    }

    /// Time left before the next tick, `None` while cancelled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Schedules the tick after a due one. Missed ticks are skipped rather
    /// than fired back to back.
    pub fn advance(&mut self, now: Instant) {
        let interval = self.interval;
        self.next_due = self.next_due.map(|due| {
            let next = due + interval;
            if next <= now {
                now + interval
            } else {
                next
            }
        });
    }
}
