use std::cell::Cell;
use std::rc::Rc;

use super::Clock;

/// Clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle while the
/// scheduler owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `time` seconds instead of zero.
    pub fn starting_at(time: f64) -> Self {
        let clock = Self::new();
        clock.set(time);
        clock
    }

    /// Move forward by `dt` seconds. Negative steps are ignored.
    pub fn advance(&self, dt: f64) {
        if dt > 0.0 {
            self.now.set(self.now.get() + dt);
        }
    }

    /// Jump to `time`. Times earlier than now are ignored so the clock stays monotonic.
    pub fn set(&self, time: f64) {
        if time > self.now.get() {
            self.now.set(time);
        }
    }
}

impl Clock for ManualClock {
    fn current_time(&self) -> f64 {
        self.now.get()
    }
}
