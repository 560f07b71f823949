//! Lookahead scheduler.
//!
//! The scheduler turns a coarse periodic timer into callbacks stamped with
//! exact logical times. Each tick reads the clock (`t0`) and drains every
//! queued entry with `time < t0 + ahead_time`, handing each callback the time
//! it asked for rather than the time the tick happened to run. A renderer that
//! accepts future start times can then place the event precisely even though
//! the tick itself jitters.
//!
//! The window is wider than the polling interval, so an entry is caught by
//! some tick as long as accumulated jitter stays below
//! `ahead_time - interval`.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Duration;

use crate::clock::Clock;
use crate::normalize::ToSeconds;
use crate::timer::{Timer, TimerHandle};

use super::config::{LatePolicy, SchedulerBuilder, SchedulerConfig};
use super::observer::{Notification, ObserverId, Observers};
use super::queue::{EntryId, EventQueue, ScheduledEntry};

/// What a callback receives when its entry is dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch<A> {
    pub id: EntryId,
    /// The entry's logical time (plus any configured offset)
    pub playback_time: f64,
    pub args: A,
}

/// Shared callback stored in the queue.
///
/// Callbacks get the scheduler back so they can insert, remove, reschedule
/// themselves or stop playback while the tick is still draining.
pub type Callback<A> = Rc<dyn Fn(&mut Scheduler<A>, Dispatch<A>)>;

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Suspended,
    Running,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Suspended => write!(f, "suspended"),
            State::Running => write!(f, "running"),
        }
    }
}

pub struct Scheduler<A = ()> {
    config: SchedulerConfig,
    clock: Box<dyn Clock>,
    timer: Box<dyn Timer>,
    normalizer: Box<dyn ToSeconds>,
    /// Logical time cursor; the window start outside of a drain
    playback_time: f64,
    /// `Some` while running
    timer_handle: Option<TimerHandle>,
    queue: EventQueue<A>,
    observers: Observers,
}

impl Scheduler {
    /// Start configuring a scheduler; the payload type is chosen at `build`.
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }
}

impl<A> Scheduler<A> {
    /// Scheduler with default timing, the system clock and the `Instant` timer.
    pub fn new() -> Self {
        Self::from_parts(
            SchedulerConfig::default(),
            Box::new(crate::clock::SystemClock::new()),
            Box::new(crate::timer::IntervalTimer::new()),
            Box::new(crate::normalize::Seconds),
        )
    }

    pub(crate) fn from_parts(
        config: SchedulerConfig,
        clock: Box<dyn Clock>,
        timer: Box<dyn Timer>,
        normalizer: Box<dyn ToSeconds>,
    ) -> Self {
        let playback_time = clock.current_time();
        Self {
            config,
            clock,
            timer,
            normalizer,
            playback_time,
            timer_handle: None,
            queue: EventQueue::new(),
            observers: Observers::new(),
        }
    }

    // --- accessors ---

    pub fn state(&self) -> State {
        if self.timer_handle.is_some() {
            State::Running
        } else {
            State::Suspended
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer_handle.is_some()
    }

    /// Clock time in seconds.
    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    /// Logical time cursor.
    ///
    /// Inside a callback this is the dispatched entry's time; otherwise it is
    /// the start of the most recent window.
    pub fn playback_time(&self) -> f64 {
        self.playback_time
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn interval(&self) -> f64 {
        self.config.interval
    }

    pub fn ahead_time(&self) -> f64 {
        self.config.ahead_time
    }

    pub fn offset_time(&self) -> f64 {
        self.config.offset_time
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Copy of the pending entries in dispatch order.
    pub fn events(&self) -> Vec<ScheduledEntry<A>>
    where
        A: Clone,
    {
        self.queue.snapshot()
    }

    /// Borrow the pending entries in dispatch order without copying.
    pub fn pending(&self) -> impl Iterator<Item = &ScheduledEntry<A>> {
        self.queue.iter()
    }

    // --- observers ---

    pub fn subscribe(&mut self, observer: impl FnMut(&Notification) + 'static) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    // --- lifecycle ---

    /// Begin polling. Does nothing if already running.
    pub fn start(&mut self) -> &mut Self {
        if self.timer_handle.is_none() {
            self.begin();
        }
        self
    }

    /// Queue `callback` at the current clock time and make sure it runs.
    ///
    /// If the scheduler was suspended it starts and dispatches immediately, so
    /// the callback has run by the time this returns. If it was already
    /// running the entry goes out on the next tick.
    pub fn start_with<F>(&mut self, callback: F, args: A) -> EntryId
    where
        F: Fn(&mut Scheduler<A>, Dispatch<A>) + 'static,
    {
        let now = self.clock.current_time();
        let was_running = self.timer_handle.is_some();

        if !was_running {
            self.begin();
        }

        let id = self.queue.insert(now, Rc::new(callback), args);

        if !was_running {
            self.tick();
        }

        id
    }

    /// Stop polling. With `reset`, also drop every pending entry, whether or
    /// not the scheduler was running.
    pub fn stop(&mut self, reset: bool) -> &mut Self {
        if let Some(handle) = self.timer_handle.take() {
            self.timer.clear_interval(handle);
            tracing::debug!(%handle, "scheduler stopped");
            self.observers.notify(Notification::Stop {
                playback_time: self.playback_time,
            });
        }

        if reset {
            tracing::debug!(dropped = self.queue.len(), "scheduler reset");
            self.queue.clear();
        }

        self
    }

    fn begin(&mut self) {
        let period = Duration::from_secs_f64(self.config.interval);
        let handle = self.timer.set_interval(period);
        self.timer_handle = Some(handle);

        tracing::debug!(
            %handle,
            interval = self.config.interval,
            ahead_time = self.config.ahead_time,
            "scheduler started"
        );
        self.observers.notify(Notification::Start {
            playback_time: self.playback_time,
        });
    }

    // --- queue ---

    /// Schedule `callback` at `time`, given in the normalizer's unit.
    pub fn insert<F>(&mut self, time: f64, callback: F, args: A) -> EntryId
    where
        F: Fn(&mut Scheduler<A>, Dispatch<A>) + 'static,
    {
        let seconds = self.normalizer.to_seconds(time);
        self.insert_seconds(seconds, Rc::new(callback), args)
    }

    /// Schedule an already-shared callback at `time` seconds, bypassing the normalizer.
    pub fn insert_callback(&mut self, time: f64, callback: Callback<A>, args: A) -> EntryId {
        self.insert_seconds(time, callback, args)
    }

    /// Schedule `callback` one window past the cursor.
    ///
    /// Inside a callback the cursor is the dispatched entry's time, so an
    /// entry that was on time lands past the current window and runs on a
    /// later tick. An entry that was already more than `ahead_time` late
    /// lands back inside the window and the same drain picks it up.
    pub fn next_tick<F>(&mut self, callback: F, args: A) -> EntryId
    where
        F: Fn(&mut Scheduler<A>, Dispatch<A>) + 'static,
    {
        let time = self.playback_time + self.config.ahead_time;
        self.insert_seconds(time, Rc::new(callback), args)
    }

    /// Schedule `callback` one window past `time` (normalizer's unit).
    pub fn next_tick_from<F>(&mut self, time: f64, callback: F, args: A) -> EntryId
    where
        F: Fn(&mut Scheduler<A>, Dispatch<A>) + 'static,
    {
        let time = self.normalizer.to_seconds(time) + self.config.ahead_time;
        self.insert_seconds(time, Rc::new(callback), args)
    }

    fn insert_seconds(&mut self, time: f64, callback: Callback<A>, args: A) -> EntryId {
        let id = self.queue.insert(time, callback, args);
        tracing::trace!(%id, time, pending = self.queue.len(), "inserted");
        id
    }

    /// Cancel a pending entry. Unknown or already dispatched ids are ignored.
    pub fn remove(&mut self, id: EntryId) -> EntryId {
        tracing::trace!(%id, "remove");
        self.queue.remove_by_id(id)
    }

    /// Cancel every pending entry.
    pub fn remove_all(&mut self) {
        self.queue.clear();
    }

    // --- dispatch ---

    /// Run one tick if the timer fired since the last poll.
    ///
    /// Hosts call this from their own loop as often as they like; firings that
    /// accumulated in between collapse into a single tick. Returns whether a
    /// tick ran.
    pub fn poll(&mut self) -> bool {
        let Some(handle) = self.timer_handle else {
            return false;
        };

        if self.timer.take_fired(handle) == 0 {
            return false;
        }

        self.tick();
        true
    }

    /// Drain the window starting at the current clock time.
    pub fn tick(&mut self) {
        let t0 = self.clock.current_time();
        let t1 = t0 + self.config.ahead_time;
        self.process(t0, t1);
    }

    /// Dispatch everything due before `t1`, reporting `t0` as the window start.
    ///
    /// A callback that panics aborts the rest of the window: the cursor goes
    /// back to `t0`, no `Processed` notification is sent, and entries still
    /// queued wait for the next tick.
    pub fn process(&mut self, t0: f64, t1: f64) {
        self.playback_time = t0;
        self.observers.notify(Notification::Process { playback_time: t0 });

        let mut dispatched = 0usize;

        // Re-read the front every iteration: callbacks may insert into this window.
        while let Some(entry) = self.queue.pop_due(t1) {
            let ScheduledEntry {
                id,
                time,
                callback,
                args,
            } = entry;

            let playback_time = self.reported_time(time, t0);
            self.playback_time = playback_time;

            let dispatch = Dispatch {
                id,
                playback_time,
                args,
            };

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(self, dispatch)));
            if let Err(payload) = outcome {
                self.playback_time = t0;
                tracing::error!(%id, time, pending = self.queue.len(), "callback panicked, aborting tick");
                panic::resume_unwind(payload);
            }

            dispatched += 1;
        }

        self.playback_time = t0;
        tracing::trace!(t0, t1, dispatched, pending = self.queue.len(), "tick");
        self.observers.notify(Notification::Processed { playback_time: t0 });
    }

    fn reported_time(&self, time: f64, t0: f64) -> f64 {
        let base = match self.config.late_policy {
            LatePolicy::Preserve => time,
            LatePolicy::ClampToCurrent => time.max(t0),
        };
        base + self.config.offset_time
    }
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Scheduler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state())
            .field("playback_time", &self.playback_time)
            .field("config", &self.config)
            .field("pending", &self.queue.len())
            .field("observers", &self.observers)
            .finish()
    }
}
