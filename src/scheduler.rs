use std::time::{Duration, Instant};

/// Frame pacing for the host loop: at most one pending frame, fired once.
pub struct FrameScheduler {
    interval: Duration,
    next: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(fps: u32) -> Self {
        FrameScheduler {
            interval: Duration::from_secs(1) / fps.max(1),
            next: None,
        }
    }

    /// Arms the next frame one interval from `now`. Already armed: no-op.
    pub fn request(&mut self, now: Instant) {
        if self.next.is_none() {
            self.next = Some(now + self.interval);
        }
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_pending(&self) -> bool {
        self.next.is_some()
    }

    /// Time left before the pending frame; `None` when nothing is armed.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.next.map(|at| at.saturating_duration_since(now))
    }

    /// Consumes the pending frame if it is due.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(at) if now >= at => {
                self.next = None;
                true
            }
            _ => false,
        }
    }
}

/// Monotonic milliseconds since the clock was created.
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Clock {
            start: Instant::now(),
        }
    }

    pub fn ms(&self, at: Instant) -> f64 {
        at.saturating_duration_since(self.start).as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_request() {
        let t0 = Instant::now();
        let mut s = FrameScheduler::new(50);
        assert!(!s.due(t0 + Duration::from_secs(1)));

        s.request(t0);
        assert!(!s.due(t0 + Duration::from_millis(19)));
        assert!(s.due(t0 + Duration::from_millis(20)));
        assert!(!s.due(t0 + Duration::from_millis(40)));
    }

    #[test]
    fn second_request_keeps_first_deadline() {
        let t0 = Instant::now();
        let mut s = FrameScheduler::new(50);
        s.request(t0);
        s.request(t0 + Duration::from_millis(15));
        assert_eq!(s.time_until(t0), Some(Duration::from_millis(20)));
    }

    #[test]
    fn cancel_disarms() {
        let t0 = Instant::now();
        let mut s = FrameScheduler::new(60);
        s.request(t0);
        s.cancel();
        assert!(!s.is_pending());
        assert_eq!(s.time_until(t0), None);
        assert!(!s.due(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn clock_is_monotonic_ms() {
        let c = Clock::start();
        let later = c.start + Duration::from_millis(250);
        assert_eq!(c.ms(later), 250.0);
        assert_eq!(c.ms(c.start), 0.0);
    }
}
