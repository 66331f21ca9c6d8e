//! Drift-correcting interval scheduler.
//!
//! Decides when a measurement window ends. The scheduler holds only
//! the interval length and the absolute time of the next boundary;
//! the embedding collector calls [`IntervalScheduler::tick`] from its
//! timer task *and* from every recording call, so a boundary is never
//! delayed by write silence nor missed by a write arriving at or after
//! it. A premature timer wake finds `now < boundary`, fires nothing,
//! and the driver simply re-arms — the state machine is self-healing
//! against scheduler jitter and early firings.

/// Emitted by [`IntervalScheduler::tick`] when a boundary has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowClose {
    /// The boundary that just closed (epoch ms).
    pub closed_at: u64,
    /// The end of the window now in progress (epoch ms).
    pub next_boundary: u64,
}

/// Per-process timer state machine over epoch milliseconds.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    interval_ms: u64,
    boundary_ms: u64,
}

impl IntervalScheduler {
    /// Phase-align the first boundary to `start_hint_ms`.
    ///
    /// The boundary satisfies `boundary > now` and
    /// `boundary ≡ start_hint (mod interval)`, so independently started
    /// processes sharing a hint converge on identical window boundaries
    /// without explicit coordination.
    pub fn new(start_hint_ms: i64, interval_ms: u64, now_ms: u64) -> Self {
        let interval = interval_ms as i64;
        let offset = (start_hint_ms - now_ms as i64).rem_euclid(interval);
        let mut boundary = now_ms as i64 + offset;
        if boundary as u64 <= now_ms {
            boundary += interval;
        }

        Self {
            interval_ms,
            boundary_ms: boundary as u64,
        }
    }

    /// The configured interval length in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Absolute time of the next window end (epoch ms).
    pub fn next_boundary(&self) -> u64 {
        self.boundary_ms
    }

    /// Check whether a boundary has passed.
    ///
    /// If so, the boundary is advanced by whole intervals until it is
    /// in the future again — the catch-up loop absorbs any number of
    /// boundaries missed while the process was blocked or descheduled.
    pub fn tick(&mut self, now_ms: u64) -> Option<WindowClose> {
        if now_ms < self.boundary_ms {
            return None;
        }

        let closed_at = self.boundary_ms;
        while self.boundary_ms <= now_ms {
            self.boundary_ms += self.interval_ms;
        }

        Some(WindowClose {
            closed_at,
            next_boundary: self.boundary_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_boundary_is_in_the_future() {
        let now = 1_000_000;
        for hint in [0i64, 1, 999_999, 1_000_000, 1_234_567] {
            let scheduler = IntervalScheduler::new(hint, 100, now);
            assert!(
                scheduler.next_boundary() > now,
                "hint {hint} produced boundary {}",
                scheduler.next_boundary()
            );
        }
    }

    #[test]
    fn boundary_is_congruent_to_start_hint() {
        let now = 1_000_000;
        let interval = 7000;
        for hint in [0i64, 3, 4321, 999_999, 2_000_001] {
            let scheduler = IntervalScheduler::new(hint, interval, now);
            let boundary = scheduler.next_boundary() as i64;
            assert_eq!(
                (boundary - hint).rem_euclid(interval as i64),
                0,
                "hint {hint} boundary {boundary}"
            );
        }
    }

    #[test]
    fn early_tick_does_not_fire() {
        let mut scheduler = IntervalScheduler::new(0, 100, 1000);
        let boundary = scheduler.next_boundary();

        assert_eq!(scheduler.tick(boundary - 1), None);
        // Ticks before the boundary never move it.
        assert_eq!(scheduler.next_boundary(), boundary);
    }

    #[test]
    fn fires_exactly_at_boundary() {
        let mut scheduler = IntervalScheduler::new(0, 100, 1000);
        let boundary = scheduler.next_boundary();

        let close = scheduler.tick(boundary).unwrap();
        assert_eq!(close.closed_at, boundary);
        assert_eq!(close.next_boundary, boundary + 100);
    }

    #[test]
    fn catch_up_absorbs_missed_boundaries() {
        let mut scheduler = IntervalScheduler::new(0, 100, 1000);
        let boundary = scheduler.next_boundary();

        // Deschedule for 10½ intervals.
        let late = boundary + 1050;
        let close = scheduler.tick(late).unwrap();
        assert_eq!(close.closed_at, boundary);
        assert!(close.next_boundary > late);
        assert_eq!((close.next_boundary - boundary) % 100, 0);

        // Exactly one window is in progress afterwards.
        assert_eq!(scheduler.tick(late), None);
    }

    #[test]
    fn consecutive_windows_are_one_interval_apart() {
        let mut scheduler = IntervalScheduler::new(42, 100, 1000);

        let first = scheduler.tick(scheduler.next_boundary()).unwrap();
        let second = scheduler.tick(first.next_boundary).unwrap();
        assert_eq!(second.closed_at, first.next_boundary);
        assert_eq!(second.next_boundary, first.next_boundary + 100);
    }
}
