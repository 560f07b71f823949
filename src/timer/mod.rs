//! Periodic timer primitives.
//!
//! The scheduler owns its timer, so a timer never calls back into it.
//! Instead the host loop calls [`Scheduler::poll`](crate::Scheduler::poll),
//! which asks the timer how many firings of its interval became due since the
//! last poll. Firings that pile up between polls are coalesced into one tick.

mod interval;
mod manual;

pub use interval::IntervalTimer;
pub use manual::ManualTimer;

use std::fmt;
use std::time::Duration;

/// Identifies one registered interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Periodic wake-up source.
pub trait Timer {
    /// Begin firing every `period`.
    fn set_interval(&mut self, period: Duration) -> TimerHandle;

    /// Stop an interval. Unknown handles are ignored.
    fn clear_interval(&mut self, handle: TimerHandle);

    /// Firings of `handle` that became due since the previous call.
    ///
    /// Returns 0 for cleared or unknown handles.
    fn take_fired(&mut self, handle: TimerHandle) -> u32;
}

impl<T: Timer + ?Sized> Timer for Box<T> {
    fn set_interval(&mut self, period: Duration) -> TimerHandle {
        (**self).set_interval(period)
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        (**self).clear_interval(handle)
    }

    fn take_fired(&mut self, handle: TimerHandle) -> u32 {
        (**self).take_fired(handle)
    }
}

/// Bookkeeping shared by both timers: firings are counted from the moment an
/// interval was registered, against whatever notion of "elapsed" the timer has.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Interval {
    pub handle: TimerHandle,
    pub period: Duration,
    pub origin: Duration,
    pub delivered: u64,
}

impl Interval {
    /// Count firings due at `elapsed` and mark them delivered.
    pub fn take_due(&mut self, elapsed: Duration) -> u32 {
        let since = elapsed.saturating_sub(self.origin);
        let period = self.period.as_nanos().max(1);
        let due = (since.as_nanos() / period) as u64;
        let fresh = due.saturating_sub(self.delivered);
        self.delivered = due.max(self.delivered);
        fresh.min(u32::MAX as u64) as u32
    }
}
