//! Deterministic rig shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use saavy_sched::{
    clock::ManualClock, timer::ManualTimer, Dispatch, Scheduler, SchedulerBuilder,
};

pub const STEP_MS: u64 = 25;

pub struct Rig<A: 'static> {
    pub sched: Scheduler<A>,
    pub clock: ManualClock,
    pub timer: ManualTimer,
    /// Milliseconds the rig has advanced
    pub elapsed_ms: u64,
}

impl<A: 'static> Rig<A> {
    pub fn new() -> Self {
        Self::with(Scheduler::builder())
    }

    /// Finish `builder` with a manual clock and timer.
    pub fn with(builder: SchedulerBuilder) -> Self {
        let clock = ManualClock::new();
        let timer = ManualTimer::new();
        let sched = builder
            .clock(clock.clone())
            .timer(timer.clone())
            .build()
            .expect("valid test configuration");
        Self {
            sched,
            clock,
            timer,
            elapsed_ms: 0,
        }
    }

    /// Fire the timer first, then advance the clock: the tick sees the time
    /// before the step.
    pub fn fire_then_advance(&mut self) -> bool {
        self.timer.advance(Duration::from_millis(STEP_MS));
        let ticked = self.sched.poll();
        self.elapsed_ms += STEP_MS;
        self.clock.set(self.elapsed_ms as f64 / 1000.0);
        ticked
    }

    /// Advance the clock first, then fire: the tick sees the time after the step.
    pub fn advance_then_fire(&mut self) -> bool {
        self.elapsed_ms += STEP_MS;
        self.clock.set(self.elapsed_ms as f64 / 1000.0);
        self.timer.advance(Duration::from_millis(STEP_MS));
        self.sched.poll()
    }

    /// Run `advance_then_fire` until `ms` milliseconds have passed.
    pub fn run_for(&mut self, ms: u64) -> usize {
        (0..ms / STEP_MS).filter(|_| self.advance_then_fire()).count()
    }
}

/// Records `(args, playback_time)` for every dispatch it sees.
#[derive(Clone)]
pub struct Recorder<A> {
    log: Rc<RefCell<Vec<(A, f64)>>>,
}

impl<A: Clone + 'static> Recorder<A> {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn callback(&self) -> impl Fn(&mut Scheduler<A>, Dispatch<A>) + 'static {
        let log = Rc::clone(&self.log);
        move |_, e| log.borrow_mut().push((e.args, e.playback_time))
    }

    /// Take everything recorded so far.
    pub fn take(&self) -> Vec<(A, f64)> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn count(&self) -> usize {
        self.log.borrow().len()
    }
}

pub fn assert_fired<A: PartialEq + std::fmt::Debug>(actual: Vec<(A, f64)>, expected: &[(A, f64)])
where
    A: Clone,
{
    assert_eq!(
        actual.len(),
        expected.len(),
        "fired {:?}, expected {:?}",
        actual,
        expected
    );
    for ((a, at), (e, et)) in actual.iter().zip(expected) {
        assert_eq!(a, e);
        assert!((at - et).abs() < 1e-9, "{:?} fired at {}, expected {}", a, at, et);
    }
}
