//! Cancellable single-deadline timer.
//!
//! The host owns the clock: it passes `now` into every call and polls
//! [`Debouncer::fire_if_due`] from its event loop, which keeps timing fully
//! deterministic under test.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// (Re)arms the timer; an already pending deadline is pushed back.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Arms the timer only when nothing is pending.
    pub fn schedule_if_idle(&mut self, now: Instant) {
        if self.deadline.is_none() {
            self.schedule(now);
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once when the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time until the pending deadline, if any.
    pub fn next_timeout(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use std::time::{Duration, Instant};

    #[test]
    fn fires_once_after_window() {
        let start = Instant::now();
        let mut timer = Debouncer::new(Duration::from_millis(50));
        timer.schedule(start);

        assert!(!timer.fire_if_due(start + Duration::from_millis(49)));
        assert!(timer.fire_if_due(start + Duration::from_millis(50)));
        assert!(!timer.fire_if_due(start + Duration::from_millis(80)));
    }

    #[test]
    fn rescheduling_pushes_deadline_back() {
        let start = Instant::now();
        let mut timer = Debouncer::new(Duration::from_millis(50));
        timer.schedule(start);
        timer.schedule(start + Duration::from_millis(30));

        assert!(!timer.fire_if_due(start + Duration::from_millis(60)));
        assert!(timer.fire_if_due(start + Duration::from_millis(80)));
    }

    #[test]
    fn schedule_if_idle_keeps_first_deadline() {
        let start = Instant::now();
        let mut timer = Debouncer::new(Duration::from_millis(100));
        timer.schedule_if_idle(start);
        timer.schedule_if_idle(start + Duration::from_millis(90));

        assert!(timer.fire_if_due(start + Duration::from_millis(100)));
    }

    #[test]
    fn cancel_clears_pending_deadline() {
        let start = Instant::now();
        let mut timer = Debouncer::new(Duration::from_millis(10));
        timer.schedule(start);
        timer.cancel();

        assert!(!timer.is_pending());
        assert_eq!(timer.next_timeout(start), None);
        assert!(!timer.fire_if_due(start + Duration::from_secs(1)));
    }

    #[test]
    fn next_timeout_saturates_at_zero() {
        let start = Instant::now();
        let mut timer = Debouncer::new(Duration::from_millis(10));
        timer.schedule(start);
        assert_eq!(
            timer.next_timeout(start + Duration::from_millis(25)),
            Some(Duration::ZERO)
        );
    }
}
