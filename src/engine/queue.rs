//! Time-ordered queue of pending entries.
//!
//! Entries are kept sorted by `time`; entries sharing a time stay in insertion
//! order. The queue is expected to hold a handful of near-future entries, so a
//! contiguous deque with positional insertion is all it needs.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use super::scheduler::Callback;

/// Identifier assigned to an entry at insertion. Never reused by a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A pending callback invocation.
pub struct ScheduledEntry<A> {
    pub id: EntryId,
    /// Logical time in seconds on the clock's timeline
    pub time: f64,
    pub callback: Callback<A>,
    pub args: A,
}

impl<A: Clone> Clone for ScheduledEntry<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            time: self.time,
            callback: Rc::clone(&self.callback),
            args: self.args.clone(),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for ScheduledEntry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledEntry")
            .field("id", &self.id)
            .field("time", &self.time)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

pub struct EventQueue<A> {
    entries: VecDeque<ScheduledEntry<A>>,
    last_id: u64,
}

impl<A> EventQueue<A> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            last_id: 0,
        }
    }

    /// Insert an entry and return its fresh id.
    ///
    /// The entry lands before the first entry whose time is strictly greater,
    /// so equal times dispatch first-in first-out. A `NaN` time goes to the
    /// back and is never due.
    pub fn insert(&mut self, time: f64, callback: Callback<A>, args: A) -> EntryId {
        self.last_id += 1;
        let id = EntryId(self.last_id);
        let entry = ScheduledEntry {
            id,
            time,
            callback,
            args,
        };

        if time.is_nan() {
            self.entries.push_back(entry);
        } else {
            // NaN entries sit at the back and fail `<=`, keeping the predicate monotone.
            let at = self.entries.partition_point(|e| e.time <= time);
            self.entries.insert(at, entry);
        }

        id
    }

    /// Remove the entry with `id` if it is still queued. Returns `id` either way.
    pub fn remove_by_id(&mut self, id: EntryId) -> EntryId {
        if let Some(at) = self.entries.iter().position(|e| e.id == id) {
            self.entries.remove(at);
        }
        id
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove and return the front entry if its time is strictly before `before`.
    pub fn pop_due(&mut self, before: f64) -> Option<ScheduledEntry<A>> {
        match self.entries.front() {
            Some(front) if front.time < before => self.entries.pop_front(),
            _ => None,
        }
    }

    /// Lazily drain every entry due strictly before `before`, in time order.
    ///
    /// Entries not consumed from the iterator stay queued.
    pub fn due_before(&mut self, before: f64) -> DueEntries<'_, A> {
        DueEntries {
            queue: self,
            before,
        }
    }

    pub fn peek(&self) -> Option<&ScheduledEntry<A>> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEntry<A>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Point-in-time copy of the queue contents.
    pub fn snapshot(&self) -> Vec<ScheduledEntry<A>>
    where
        A: Clone,
    {
        self.entries.iter().cloned().collect()
    }
}

impl<A> Default for EventQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: fmt::Debug> fmt::Debug for EventQueue<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("entries", &self.entries)
            .field("last_id", &self.last_id)
            .finish()
    }
}

/// Iterator returned by [`EventQueue::due_before`].
pub struct DueEntries<'a, A> {
    queue: &'a mut EventQueue<A>,
    before: f64,
}

impl<A> Iterator for DueEntries<'_, A> {
    type Item = ScheduledEntry<A>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_due(self.before)
    }
}
