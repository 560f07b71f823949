//! Clock sources the scheduler reads its window from.
//!
//! A clock only has to report a non-decreasing time in seconds. Three are
//! provided:
//! - [`SystemClock`]: monotonic wall time since creation (the default)
//! - [`FrameClock`]: an audio clock derived from frames rendered by an output callback
//! - [`ManualClock`]: advanced explicitly, for tests and offline rendering

mod frame;
mod manual;

pub use frame::{FrameClock, FrameCounter};
pub use manual::ManualClock;

use std::time::Instant;

/// Source of the scheduler's reference time.
pub trait Clock {
    /// Current time in seconds. Must never go backwards.
    fn current_time(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn current_time(&self) -> f64 {
        (**self).current_time()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn current_time(&self) -> f64 {
        (**self).current_time()
    }
}

/// Monotonic clock starting at zero when created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn current_time(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}
