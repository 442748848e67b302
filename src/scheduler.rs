//! Cooperative timing for a single-threaded game loop.
//!
//! Nothing here sleeps or spawns: the frontend polls with the current
//! instant and runs whatever is due.

use std::time::{Duration, Instant};

/// At most this many ticks are replayed after a stall; older ones are dropped.
pub const MAX_CATCH_UP: u32 = 5;

/// A cancellable repeating task with a fixed interval.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Arm the ticker; the first tick is due one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Count the ticks due at `now` and move the deadline past them.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        let mut count = 0;
        while next <= now && count < MAX_CATCH_UP {
            count += 1;
            next += self.interval;
        }
        if next <= now {
            next = now + self.interval;
        }
        self.next = Some(next);
        count
    }
}

/// One-shot delayed items.  Once scheduled an item always fires; there is
/// no cancellation.
#[derive(Clone, Debug)]
pub struct DelayQueue<T> {
    pending: Vec<(Instant, T)>,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> DelayQueue<T> {
    pub fn schedule(&mut self, at: Instant, item: T) {
        self.pending.push((at, item));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every item due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = pending;
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, item)| item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_counts_due_ticks_and_caps_backlog() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(16));
        assert_eq!(ticker.due(t0 + Duration::from_secs(1)), 0);

        ticker.start(t0);
        assert_eq!(ticker.due(t0 + Duration::from_millis(10)), 0);
        assert_eq!(ticker.due(t0 + Duration::from_millis(33)), 2);
        assert_eq!(ticker.due(t0 + Duration::from_secs(10)), MAX_CATCH_UP);
        assert!(ticker.next_deadline().unwrap() > t0 + Duration::from_secs(10));

        ticker.stop();
        assert!(!ticker.is_running());
        assert_eq!(ticker.due(t0 + Duration::from_secs(20)), 0);
    }

    #[test]
    fn delay_queue_releases_in_deadline_order() {
        let t0 = Instant::now();
        let mut queue = DelayQueue::default();
        queue.schedule(t0 + Duration::from_millis(30), "late");
        queue.schedule(t0 + Duration::from_millis(10), "early");
        queue.schedule(t0 + Duration::from_millis(90), "later");

        assert!(queue.take_due(t0).is_empty());
        assert_eq!(queue.take_due(t0 + Duration::from_millis(50)), vec!["early", "late"]);
        assert_eq!(queue.len(), 1);
    }
}
