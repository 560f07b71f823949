//! Conversion of caller time arguments into seconds.
//!
//! `Scheduler::insert` takes times in whatever unit the caller works in and
//! runs them through a [`ToSeconds`] before they reach the queue.

/// Converts a caller-supplied time value into seconds.
pub trait ToSeconds {
    fn to_seconds(&self, value: f64) -> f64;
}

/// Identity: values are already seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seconds;

impl ToSeconds for Seconds {
    #[inline]
    fn to_seconds(&self, value: f64) -> f64 {
        value
    }
}

/// Values are milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Millis;

impl ToSeconds for Millis {
    #[inline]
    fn to_seconds(&self, value: f64) -> f64 {
        value / 1000.0
    }
}

/// Values are musical ticks at a fixed tempo.
///
/// `ppq` is pulses per quarter note, so one tick lasts `60 / (bpm * ppq)`
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticks {
    pub bpm: f64,
    pub ppq: u32,
}

impl Ticks {
    pub fn new(bpm: f64, ppq: u32) -> Self {
        Self { bpm, ppq }
    }

    /// Length of a single tick in seconds.
    pub fn seconds_per_tick(&self) -> f64 {
        // ticks per second = (bpm / 60) * ppq
        let ticks_per_second = (self.bpm / 60.0) * self.ppq as f64;
        1.0 / ticks_per_second
    }
}

impl ToSeconds for Ticks {
    fn to_seconds(&self, value: f64) -> f64 {
        value * self.seconds_per_tick()
    }
}

impl<F> ToSeconds for F
where
    F: Fn(f64) -> f64,
{
    fn to_seconds(&self, value: f64) -> f64 {
        self(value)
    }
}
