//! Trailing-edge save debouncer.
//!
//! Time is passed in by the caller, so the debouncer has no timer thread
//! and is driven by the host's event loop (`tick`).

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SaveDebouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl SaveDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending deadline and arms a new one `delay` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
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

    /// Disarms and returns `true` once the quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SaveDebouncer;
    use std::time::{Duration, Instant};

    #[test]
    fn rescheduling_pushes_deadline_back() {
        let start = Instant::now();
        let mut debouncer = SaveDebouncer::new(Duration::from_millis(300));
        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(200));

        assert!(!debouncer.take_due(start + Duration::from_millis(300)));
        assert!(debouncer.take_due(start + Duration::from_millis(500)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancel_disarms_pending_save() {
        let start = Instant::now();
        let mut debouncer = SaveDebouncer::new(Duration::from_millis(10));
        debouncer.schedule(start);
        debouncer.cancel();
        assert!(!debouncer.take_due(start + Duration::from_secs(1)));
    }
}
