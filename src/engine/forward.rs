//! Hand-off of dispatched events to a realtime thread.
//!
//! The scheduler runs on a control thread; the audio callback must never
//! block on it. A [`Forwarder`] is a callback factory whose callbacks push
//! `(playback_time, value)` pairs into a lock-free `rtrb` ring, and the audio
//! side drains them with [`TimedReceiver::pop`] and starts each one at the
//! frame its logical time falls on.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rtrb::{Consumer, Producer, RingBuffer};

use super::queue::EntryId;
use super::scheduler::{Dispatch, Scheduler};

/// A value stamped with the logical time it should take effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timed<T> {
    pub time: f64,
    pub value: T,
}

pub trait TimedReceiver<T> {
    fn pop(&mut self) -> Option<Timed<T>>;
}

impl<T> TimedReceiver<T> for Consumer<Timed<T>> {
    fn pop(&mut self) -> Option<Timed<T>> {
        Consumer::pop(self).ok()
    }
}

/// Producer side, owned by the scheduler's thread.
pub struct Forwarder<T> {
    tx: Rc<RefCell<Producer<Timed<T>>>>,
    dropped: Rc<Cell<u64>>,
}

impl<T: 'static> Forwarder<T> {
    /// Create a forwarder and the consumer for the realtime side.
    pub fn new(capacity: usize) -> (Self, Consumer<Timed<T>>) {
        let (tx, rx) = RingBuffer::new(capacity);
        let forwarder = Self {
            tx: Rc::new(RefCell::new(tx)),
            dropped: Rc::new(Cell::new(0)),
        };
        (forwarder, rx)
    }

    /// Callback that forwards its dispatch into the ring.
    pub fn callback(&self) -> impl Fn(&mut Scheduler<T>, Dispatch<T>) + 'static {
        let tx = Rc::clone(&self.tx);
        let dropped = Rc::clone(&self.dropped);
        move |_, event| {
            let timed = Timed {
                time: event.playback_time,
                value: event.args,
            };
            if tx.borrow_mut().push(timed).is_err() {
                dropped.set(dropped.get() + 1);
                tracing::warn!(id = %event.id, time = event.playback_time, "ring full, event dropped");
            }
        }
    }

    /// Schedule `value` to be forwarded when `time` comes into the window.
    pub fn schedule(&self, sched: &mut Scheduler<T>, time: f64, value: T) -> EntryId {
        sched.insert(time, self.callback(), value)
    }

    /// Events lost because the consumer fell behind.
    pub fn dropped(&self) -> u64 {
        self.dropped.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::timer::ManualTimer;

    fn scheduler() -> Scheduler<u8> {
        Scheduler::builder()
            .clock(ManualClock::new())
            .timer(ManualTimer::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_forwards_in_time_order() {
        let mut sched = scheduler();
        let (fwd, mut rx) = Forwarder::new(8);

        fwd.schedule(&mut sched, 0.05, 2);
        fwd.schedule(&mut sched, 0.01, 1);
        fwd.schedule(&mut sched, 0.5, 3);
        sched.tick();

        assert_eq!(TimedReceiver::pop(&mut rx), Some(Timed { time: 0.01, value: 1 }));
        assert_eq!(TimedReceiver::pop(&mut rx), Some(Timed { time: 0.05, value: 2 }));
        assert_eq!(TimedReceiver::pop(&mut rx), None);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn test_counts_drops_when_full() {
        let mut sched = scheduler();
        let (fwd, _rx) = Forwarder::new(1);

        fwd.schedule(&mut sched, 0.0, 1);
        fwd.schedule(&mut sched, 0.0, 2);
        sched.tick();

        assert_eq!(fwd.dropped(), 1);
    }
}
