//! Lookahead event scheduling for audio.
//!
//! A [`Scheduler`] polls a coarse timer and, on every tick, dispatches the
//! queued callbacks whose logical time falls inside the next `ahead_time`
//! seconds of an external clock. Callbacks learn the exact time they were
//! scheduled for, so a renderer can start sounds on the right sample even
//! though the tick that dispatched them ran early and jittery.
//!
//! ```
//! use saavy_sched::{clock::ManualClock, timer::ManualTimer, Scheduler};
//!
//! let clock = ManualClock::new();
//! let mut sched: Scheduler<&str> = Scheduler::builder()
//!     .clock(clock.clone())
//!     .timer(ManualTimer::new())
//!     .build()
//!     .unwrap();
//!
//! sched.insert(0.05, |_, e| println!("{} at {:.3}", e.args, e.playback_time), "kick");
//! sched.tick(); // window [0.0, 0.1) -> "kick at 0.050"
//! assert!(sched.is_empty());
//! ```

pub mod clock;
pub mod engine; // Queue, scheduler, observers, config
pub mod normalize;
pub mod timer;

pub use engine::{
    ConfigError, Dispatch, EntryId, LatePolicy, Notification, ScheduledEntry, Scheduler,
    SchedulerBuilder, SchedulerConfig, State,
};

/// Default polling period in seconds.
pub const DEFAULT_INTERVAL: f64 = 0.025;
/// Default dispatch window in seconds.
pub const DEFAULT_AHEAD_TIME: f64 = 0.1;
