use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::{Interval, Timer, TimerHandle};

#[derive(Debug, Default)]
struct Inner {
    elapsed: Duration,
    next_handle: u64,
    intervals: Vec<Interval>,
}

/// Deterministic timer whose time only moves on [`advance`](Self::advance).
///
/// Clones share state: hand one to the scheduler and keep one to drive it.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    inner: Rc<RefCell<Inner>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the timer's notion of time forward.
    pub fn advance(&self, dt: Duration) {
        self.inner.borrow_mut().elapsed += dt;
    }

    /// Total time advanced so far.
    pub fn elapsed(&self) -> Duration {
        self.inner.borrow().elapsed
    }

    /// Number of live intervals.
    pub fn active(&self) -> usize {
        self.inner.borrow().intervals.len()
    }
}

impl Timer for ManualTimer {
    fn set_interval(&mut self, period: Duration) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_handle += 1;
        let handle = TimerHandle::new(inner.next_handle);
        let origin = inner.elapsed;
        inner.intervals.push(Interval {
            handle,
            period,
            origin,
            delivered: 0,
        });
        handle
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        self.inner
            .borrow_mut()
            .intervals
            .retain(|iv| iv.handle != handle);
    }

    fn take_fired(&mut self, handle: TimerHandle) -> u32 {
        let mut inner = self.inner.borrow_mut();
        let elapsed = inner.elapsed;
        inner
            .intervals
            .iter_mut()
            .find(|iv| iv.handle == handle)
            .map(|iv| iv.take_due(elapsed))
            .unwrap_or(0)
    }
}
