//! # Periodic Timer
//!
//! Absolute-deadline delay-until for fixed-period tasks.
//!
//! ## Design
//!
//! The timer must:
//! - Wake at `last_wake + period`, never at `now + period`
//! - Never burst to catch up after a stall
//! - Count how often a deadline was missed

use std::time::{Duration, Instant};

/// Fixed-period wake-up timer.
///
/// ```rust,ignore
/// let mut timer = PeriodicTimer::new(Duration::from_millis(20));
/// loop {
///     timer.wait_next();
///     // act
/// }
/// ```
pub struct PeriodicTimer {
    /// Target period.
    period: Duration,
    /// Time of the last scheduled wake-up.
    last_wake: Instant,
    /// Timing statistics.
    stats: TimerStats,
}

/// Timer statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimerStats {
    /// Wake-ups delivered.
    pub ticks: u64,
    /// Wake-ups that arrived more than one full period late.
    pub late_ticks: u64,
}

impl PeriodicTimer {
    /// Creates a timer whose first deadline is one period from now.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self::starting_at(Instant::now(), period)
    }

    /// Creates a timer whose first deadline is `start + period`.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    #[must_use]
    pub fn starting_at(start: Instant, period: Duration) -> Self {
        assert!(!period.is_zero(), "timer period must be non-zero");
        Self {
            period,
            last_wake: start,
            stats: TimerStats::default(),
        }
    }

    /// Returns the next absolute deadline.
    #[inline]
    #[must_use]
    pub fn next_deadline(&self) -> Instant {
        self.last_wake + self.period
    }

    /// Advances the schedule given the current time.
    ///
    /// Returns how long the caller has to sleep before the deadline.
    /// When the caller is more than a full period behind, the schedule is
    /// re-anchored at `now` and the tick is counted as late.
    pub fn advance(&mut self, now: Instant) -> Duration {
        let deadline = self.next_deadline();
        self.stats.ticks += 1;

        if now > deadline + self.period {
            self.stats.late_ticks += 1;
            self.last_wake = now;
            return Duration::ZERO;
        }

        self.last_wake = deadline;
        deadline.saturating_duration_since(now)
    }

    /// Blocks until the next deadline.
    ///
    /// This is the task's only intended suspension point.
    pub fn wait_next(&mut self) {
        let remaining = self.advance(Instant::now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }

    /// Returns timing statistics.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> TimerStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadlines_do_not_drift() {
        let start = Instant::now();
        let period = Duration::from_millis(10);
        let mut timer = PeriodicTimer::starting_at(start, period);

        // Woken 3ms late: next sleep is shortened, deadline stays on the grid
        let sleep = timer.advance(start + Duration::from_millis(3));
        assert_eq!(sleep, Duration::from_millis(7));
        assert_eq!(timer.next_deadline(), start + Duration::from_millis(20));

        let sleep = timer.advance(start + Duration::from_millis(14));
        assert_eq!(sleep, Duration::from_millis(6));
        assert_eq!(timer.next_deadline(), start + Duration::from_millis(30));
    }

    #[test]
    fn test_stall_resyncs_without_burst() {
        let start = Instant::now();
        let period = Duration::from_millis(10);
        let mut timer = PeriodicTimer::starting_at(start, period);

        let stall = start + Duration::from_millis(55);
        assert_eq!(timer.advance(stall), Duration::ZERO);
        assert_eq!(timer.next_deadline(), stall + period);
        assert_eq!(timer.stats().late_ticks, 1);
        assert_eq!(timer.stats().ticks, 1);
    }

    #[test]
    fn test_wait_next_sleeps() {
        let mut timer = PeriodicTimer::new(Duration::from_millis(2));
        let before = Instant::now();
        timer.wait_next();
        timer.wait_next();
        assert!(before.elapsed() >= Duration::from_millis(3));
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_period_panics() {
        let _ = PeriodicTimer::new(Duration::ZERO);
    }
}
