//! Wrap-safe millisecond timers.
//!
//! Every timing decision in the controller is made against a free-running
//! `u32` millisecond counter that is allowed to wrap (roughly every 49.7 days).
//! Elapsed time is therefore always computed as `now.wrapping_sub(start)`,
//! never by comparing absolute timestamps.
//!
//! A [`Timer`] is either *unset* or holds the snapshot it was started at. The
//! unset state is distinct from "started at 0", so a timer started right at
//! boot behaves exactly like one started later.
//!
//! # Example
//!
//! ```rust
//! use rs_gatekeeper::Timer;
//!
//! let mut timer = Timer::unset();
//! assert!(!timer.is_running());
//! assert_eq!(timer.elapsed(100), None);
//!
//! timer.start(u32::MAX - 10);
//! // 20ms later the counter has wrapped
//! assert_eq!(timer.elapsed(9), Some(20));
//! assert!(timer.has_elapsed(9, 20));
//! assert!(!timer.exceeded(9, 20));
//! ```

/// Milliseconds elapsed between `since` and `now` on a wrapping counter.
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// A monotonic snapshot that may be unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    started: Option<u32>,
}

impl Timer {
    /// Creates a timer that has not been started.
    #[inline]
    pub const fn unset() -> Self {
        Self { started: None }
    }

    /// Creates a timer already started at `now`.
    #[inline]
    pub const fn started_at(now: u32) -> Self {
        Self { started: Some(now) }
    }

    /// Starts (or restarts) the timer at `now`.
    #[inline]
    pub fn start(&mut self, now: u32) {
        self.started = Some(now);
    }

    /// Starts the timer only if it is not already running.
    #[inline]
    pub fn start_if_unset(&mut self, now: u32) {
        if self.started.is_none() {
            self.started = Some(now);
        }
    }

    /// Returns the timer to the unset state.
    #[inline]
    pub fn clear(&mut self) {
        self.started = None;
    }

    /// Returns true if the timer holds a snapshot.
    #[inline]
    pub const fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// The snapshot the timer was started at, if any.
    #[inline]
    pub const fn started(&self) -> Option<u32> {
        self.started
    }

    /// Milliseconds since the timer was started, or `None` if unset.
    #[inline]
    pub fn elapsed(&self, now: u32) -> Option<u32> {
        self.started.map(|since| elapsed_ms(now, since))
    }

    /// True if the timer is running and at least `ms` have passed.
    #[inline]
    pub fn has_elapsed(&self, now: u32, ms: u32) -> bool {
        self.elapsed(now).is_some_and(|e| e >= ms)
    }

    /// True if the timer is running and strictly more than `ms` have passed.
    #[inline]
    pub fn exceeded(&self, now: u32, ms: u32) -> bool {
        self.elapsed(now).is_some_and(|e| e > ms)
    }

    /// True if the timer is running and fewer than `ms` have passed.
    #[inline]
    pub fn within(&self, now: u32, ms: u32) -> bool {
        self.elapsed(now).is_some_and(|e| e < ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_timer_reports_nothing() {
        let timer = Timer::unset();
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed(1234), None);
        assert!(!timer.has_elapsed(1234, 0));
        assert!(!timer.exceeded(1234, 0));
        assert!(!timer.within(1234, u32::MAX));
    }

    #[test]
    fn started_at_zero_is_not_unset() {
        let timer = Timer::started_at(0);
        assert!(timer.is_running());
        assert_eq!(timer.elapsed(0), Some(0));
        assert!(timer.has_elapsed(0, 0));
    }

    #[test]
    fn boundaries() {
        let timer = Timer::started_at(1000);
        assert!(timer.has_elapsed(1200, 200));
        assert!(!timer.exceeded(1200, 200));
        assert!(timer.exceeded(1201, 200));
        assert!(timer.within(1199, 200));
        assert!(!timer.within(1200, 200));
    }

    #[test]
    fn wraparound() {
        let timer = Timer::started_at(u32::MAX - 99);
        assert_eq!(timer.elapsed(0), Some(100));
        assert_eq!(timer.elapsed(400), Some(500));
        assert!(timer.exceeded(400, 499));
    }

    #[test]
    fn start_if_unset_keeps_first_snapshot() {
        let mut timer = Timer::unset();
        timer.start_if_unset(10);
        timer.start_if_unset(50);
        assert_eq!(timer.started(), Some(10));

        timer.clear();
        timer.start_if_unset(50);
        assert_eq!(timer.started(), Some(50));
    }

    #[test]
    fn elapsed_ms_helper() {
        assert_eq!(elapsed_ms(10, 5), 5);
        assert_eq!(elapsed_ms(5, u32::MAX), 6);
    }
}
