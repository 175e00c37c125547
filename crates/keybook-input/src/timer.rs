//! Repeat timers.
//!
//! A [`RepeatTimer`] is a plain value: the interval and the next instant it
//! is due. Nothing runs in the background. The registry polls timers from
//! [`crate::Keyboard::tick`] and drops them when the key is released, which
//! is the only way a timer is cancelled.

use std::time::Duration;

use keybook_core::Timestamp;

/// Periodic timer armed while a repeating hotkey's key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTimer<I> {
    interval: Duration,
    next_due: I,
}

impl<I: Timestamp> RepeatTimer<I> {
    /// Arm a timer that first fires one `interval` after `now`.
    ///
    /// `interval` must be non-zero.
    pub fn start(now: I, interval: Duration) -> Self {
        debug_assert!(!interval.is_zero(), "repeat interval must be non-zero");
        Self { interval, next_due: now + interval }
    }

    /// Repeat interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Instant of the next firing.
    pub fn next_due(&self) -> I {
        self.next_due
    }

    /// True if the timer should fire at `now`.
    pub fn is_due(&self, now: I) -> bool {
        now >= self.next_due
    }

    /// Reschedule after a firing at `now`.
    ///
    /// Periods missed because the host ticked late are skipped rather than
    /// replayed, so the next due instant is always strictly after `now` and
    /// stays on the original `t0 + k * interval` grid.
    pub fn advance(&mut self, now: I) {
        if now < self.next_due {
            return;
        }
        let period = self.interval.as_nanos().max(1);
        let missed = (now - self.next_due).as_nanos() / period;
        let steps = u32::try_from(missed + 1).unwrap_or(u32::MAX);
        self.next_due = self.next_due + self.interval.saturating_mul(steps);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn first_firing_is_one_interval_out() {
        let t0 = Instant::now();
        let timer = RepeatTimer::start(t0, INTERVAL);

        assert!(!timer.is_due(t0));
        assert!(!timer.is_due(t0 + Duration::from_millis(99)));
        assert!(timer.is_due(t0 + INTERVAL));
    }

    #[test]
    fn advance_stays_on_grid() {
        let t0 = Instant::now();
        let mut timer = RepeatTimer::start(t0, INTERVAL);

        timer.advance(t0 + INTERVAL);
        assert_eq!(timer.next_due(), t0 + INTERVAL * 2);

        // Host ticked 30ms late: next firing is still t0 + 300ms.
        timer.advance(t0 + Duration::from_millis(230));
        assert_eq!(timer.next_due(), t0 + INTERVAL * 3);
    }

    #[test]
    fn advance_skips_missed_periods() {
        let t0 = Instant::now();
        let mut timer = RepeatTimer::start(t0, INTERVAL);

        timer.advance(t0 + Duration::from_millis(1050));
        assert_eq!(timer.next_due(), t0 + Duration::from_millis(1100));
    }

    #[test]
    fn advance_before_due_is_noop() {
        let t0 = Instant::now();
        let mut timer = RepeatTimer::start(t0, INTERVAL);

        timer.advance(t0 + Duration::from_millis(50));
        assert_eq!(timer.next_due(), t0 + INTERVAL);
    }
}
