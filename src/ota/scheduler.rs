//! Interval gate for the version check.
//!
//! The scheduler does not own a timer. The caller feeds it the current tick
//! from its idle loop and it answers whether a check is due. Ticks are `u32`
//! milliseconds that wrap, so elapsed time is always taken with wrapping
//! subtraction.

/// A monotonic millisecond tick source.
pub trait Clock {
    /// Milliseconds since an arbitrary origin, wrapping at `u32::MAX`.
    fn now_ms(&self) -> u32;
}

impl<F: Fn() -> u32> Clock for F {
    fn now_ms(&self) -> u32 {
        self()
    }
}

/// [`Clock`] backed by [`std::time::Instant`], counting from its creation.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Starts counting from now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        // Truncation gives the same wrapping behaviour as a hardware counter.
        self.origin.elapsed().as_millis() as u32
    }
}

/// Fires at most once per interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    interval_ms: u32,
    last_check: u32,
}

impl Scheduler {
    /// Creates a scheduler whose first check is due `interval_ms` after `start`.
    pub fn new(interval_ms: u32, start: u32) -> Self {
        Self {
            interval_ms,
            last_check: start,
        }
    }

    /// Whether a full interval has elapsed since the last check.
    pub fn is_due(&self, now: u32) -> bool {
        now.wrapping_sub(self.last_check) >= self.interval_ms
    }

    /// Fires if due, recording `now` as the last check.
    pub fn poll(&mut self, now: u32) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_check = now;
        true
    }

    /// [`poll`](Self::poll) with the tick read from `clock`.
    pub fn poll_clock<C: Clock + ?Sized>(&mut self, clock: &C) -> bool {
        self.poll(clock.now_ms())
    }

    /// Restarts the interval at `now` without firing.
    pub fn reset(&mut self, now: u32) {
        self.last_check = now;
    }

    /// Tick of the last check, or the start tick if none has fired.
    pub fn last_check(&self) -> u32 {
        self.last_check
    }

    /// The configured interval.
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}
