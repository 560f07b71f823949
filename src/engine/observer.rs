//! Lifecycle notifications and the observer list that fans them out.

use std::fmt;

/// Pushed to observers synchronously, in subscription order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    /// The scheduler went from suspended to running.
    Start { playback_time: f64 },
    /// The scheduler went from running to suspended.
    Stop { playback_time: f64 },
    /// A tick is about to drain its window. `playback_time` is the window start.
    Process { playback_time: f64 },
    /// A tick finished draining. `playback_time` is back at the window start.
    Processed { playback_time: f64 },
}

impl Notification {
    pub fn playback_time(&self) -> f64 {
        match *self {
            Notification::Start { playback_time }
            | Notification::Stop { playback_time }
            | Notification::Process { playback_time }
            | Notification::Processed { playback_time } => playback_time,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Notification::Start { .. } => "start",
            Notification::Stop { .. } => "stop",
            Notification::Process { .. } => "process",
            Notification::Processed { .. } => "processed",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.3}s", self.name(), self.playback_time())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&Notification)>;

/// Ordered list of observers.
#[derive(Default)]
pub struct Observers {
    list: Vec<(ObserverId, Observer)>,
    last_id: u64,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Notification) + 'static) -> ObserverId {
        self.last_id += 1;
        let id = ObserverId(self.last_id);
        self.list.push((id, Box::new(observer)));
        id
    }

    /// Returns whether the observer was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.list.len();
        self.list.retain(|(oid, _)| *oid != id);
        self.list.len() != before
    }

    pub fn notify(&mut self, notification: Notification) {
        for (_, observer) in &mut self.list {
            observer(&notification);
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.list.len())
            .finish()
    }
}
