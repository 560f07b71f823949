//! Benchmarks for a metronome-style chain forwarded into an rtrb ring.

use std::hint::black_box;
use std::time::Duration;

use criterion::Criterion;
use saavy_sched::engine::forward::{Forwarder, TimedReceiver};
use saavy_sched::{clock::ManualClock, timer::ManualTimer, Dispatch, Scheduler};

fn beat(sched: &mut Scheduler<u64>, e: Dispatch<u64>) {
    sched.next_tick(beat, e.args + 1);
}

pub fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/forward");

    // One second of 25ms polls with 16th notes at 120bpm in flight
    group.bench_function("one_second", |b| {
        b.iter(|| {
            let clock = ManualClock::new();
            let timer = ManualTimer::new();
            let mut sched: Scheduler<u64> = Scheduler::builder()
                .clock(clock.clone())
                .timer(timer.clone())
                .build()
                .expect("default timing is valid");
            let (forwarder, mut rx) = Forwarder::new(64);

            for i in 0..8u64 {
                forwarder.schedule(&mut sched, i as f64 * 0.125, i);
            }
            sched.start_with(beat, 0);

            let mut received = 0u64;
            for _ in 0..40 {
                clock.advance(0.025);
                timer.advance(Duration::from_millis(25));
                sched.poll();
                while let Some(timed) = TimedReceiver::pop(&mut rx) {
                    received += timed.value;
                }
            }
            black_box(received)
        })
    });

    group.finish();
}
