pub mod config;
#[cfg(feature = "rtrb")]
pub mod forward;
pub mod observer;
pub mod queue;
pub mod scheduler;

pub use config::{ConfigError, LatePolicy, SchedulerBuilder, SchedulerConfig};
pub use observer::{Notification, ObserverId};
pub use queue::{EntryId, EventQueue, ScheduledEntry};
pub use scheduler::{Callback, Dispatch, Scheduler, State};
