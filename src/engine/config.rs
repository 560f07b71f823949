//! Scheduler timing configuration and the builder that injects collaborators.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::normalize::{Seconds, ToSeconds};
use crate::timer::{IntervalTimer, Timer};
use crate::{DEFAULT_AHEAD_TIME, DEFAULT_INTERVAL};

use super::scheduler::Scheduler;

/// How an entry that is already late when dispatched reports its time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LatePolicy {
    /// Hand the callback the entry's own time, even if it has passed.
    #[default]
    Preserve,
    /// Hand the callback `max(time, window start)`.
    ClampToCurrent,
}

/// Timing parameters, all in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Polling period requested from the timer
    pub interval: f64,
    /// Width of the dispatch window; must exceed `interval`
    pub ahead_time: f64,
    /// Fixed latency added to the time reported to callbacks
    pub offset_time: f64,
    pub late_policy: LatePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            ahead_time: DEFAULT_AHEAD_TIME,
            offset_time: 0.0,
            late_policy: LatePolicy::Preserve,
        }
    }
}

impl SchedulerConfig {
    /// Check the parameters describe a usable window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("interval", self.interval),
            ("ahead_time", self.ahead_time),
            ("offset_time", self.offset_time),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        if self.interval <= 0.0 {
            return Err(ConfigError::NonPositiveInterval(self.interval));
        }

        if Duration::try_from_secs_f64(self.interval).is_err() {
            return Err(ConfigError::IntervalOutOfRange(self.interval));
        }

        if self.ahead_time <= self.interval {
            return Err(ConfigError::AheadTimeTooShort {
                ahead_time: self.ahead_time,
                interval: self.interval,
            });
        }

        if self.offset_time < 0.0 {
            return Err(ConfigError::NegativeOffset(self.offset_time));
        }

        Ok(())
    }

    /// Jitter the window tolerates before an entry could be caught late.
    pub fn jitter_margin(&self) -> f64 {
        self.ahead_time - self.interval
    }
}

/// Rejected scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("interval must be positive, got {0}s")]
    NonPositiveInterval(f64),
    #[error("interval of {0}s is too long for the timer")]
    IntervalOutOfRange(f64),
    #[error("ahead_time ({ahead_time}s) must exceed interval ({interval}s) to absorb timer jitter")]
    AheadTimeTooShort { ahead_time: f64, interval: f64 },
    #[error("offset_time must not be negative, got {0}s")]
    NegativeOffset(f64),
}

/// Builder for [`Scheduler`].
///
/// Every collaborator is optional; unset ones fall back to the monotonic
/// system clock, the `Instant` timer and second-valued times.
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    clock: Option<Box<dyn Clock>>,
    timer: Option<Box<dyn Timer>>,
    normalizer: Option<Box<dyn ToSeconds>>,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
            clock: None,
            timer: None,
            normalizer: None,
        }
    }

    /// Replace all timing parameters at once.
    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn timer(mut self, timer: impl Timer + 'static) -> Self {
        self.timer = Some(Box::new(timer));
        self
    }

    pub fn normalizer(mut self, normalizer: impl ToSeconds + 'static) -> Self {
        self.normalizer = Some(Box::new(normalizer));
        self
    }

    /// Polling period in seconds (default 0.025)
    pub fn interval(mut self, interval: f64) -> Self {
        self.config.interval = interval;
        self
    }

    /// Dispatch window in seconds (default 0.1)
    pub fn ahead_time(mut self, ahead_time: f64) -> Self {
        self.config.ahead_time = ahead_time;
        self
    }

    /// Latency added to reported playback times (default 0)
    pub fn offset_time(mut self, offset_time: f64) -> Self {
        self.config.offset_time = offset_time;
        self
    }

    pub fn late_policy(mut self, late_policy: LatePolicy) -> Self {
        self.config.late_policy = late_policy;
        self
    }

    /// Validate the configuration and build the scheduler.
    pub fn build<A>(self) -> Result<Scheduler<A>, ConfigError> {
        if let Err(err) = self.config.validate() {
            tracing::warn!(%err, "rejected scheduler configuration");
            return Err(err);
        }

        Ok(Scheduler::from_parts(
            self.config,
            self.clock.unwrap_or_else(|| Box::new(SystemClock::new())),
            self.timer.unwrap_or_else(|| Box::new(IntervalTimer::new())),
            self.normalizer.unwrap_or_else(|| Box::new(Seconds)),
        ))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
