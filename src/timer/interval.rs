use std::time::{Duration, Instant};

use super::{Interval, Timer, TimerHandle};

/// Timer backed by `std::time::Instant`.
///
/// Nothing runs in the background; firings are computed when polled, so the
/// host loop decides how often the scheduler actually wakes.
#[derive(Debug)]
pub struct IntervalTimer {
    origin: Instant,
    next_handle: u64,
    intervals: Vec<Interval>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            next_handle: 0,
            intervals: Vec::new(),
        }
    }

    /// Number of live intervals.
    pub fn active(&self) -> usize {
        self.intervals.len()
    }

    /// Time left until the next firing of any live interval, if one exists.
    ///
    /// Hosts use this to sleep or block on input without overshooting.
    pub fn until_next_firing(&self) -> Option<Duration> {
        let elapsed = self.origin.elapsed();
        self.intervals
            .iter()
            .map(|iv| {
                let next = iv.origin + iv.period * (iv.delivered as u32 + 1);
                next.saturating_sub(elapsed)
            })
            .min()
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for IntervalTimer {
    fn set_interval(&mut self, period: Duration) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle::new(self.next_handle);
        self.intervals.push(Interval {
            handle,
            period,
            origin: self.origin.elapsed(),
            delivered: 0,
        });
        handle
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        self.intervals.retain(|iv| iv.handle != handle);
    }

    fn take_fired(&mut self, handle: TimerHandle) -> u32 {
        let elapsed = self.origin.elapsed();
        self.intervals
            .iter_mut()
            .find(|iv| iv.handle == handle)
            .map(|iv| iv.take_due(elapsed))
            .unwrap_or(0)
    }
}
