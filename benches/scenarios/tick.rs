//! Benchmarks for a full tick: notifications, drain and dispatch.

use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{BatchSize, BenchmarkId, Criterion};
use saavy_sched::{clock::ManualClock, timer::ManualTimer, Notification, Scheduler};

use crate::engine::scattered_times;
use crate::QUEUE_SIZES;

fn scheduler(clock: &ManualClock) -> Scheduler<u32> {
    Scheduler::builder()
        .clock(clock.clone())
        .timer(ManualTimer::new())
        .build()
        .expect("default timing is valid")
}

pub fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/tick");

    for &size in QUEUE_SIZES {
        // Everything lands in one window
        group.bench_with_input(BenchmarkId::new("dense_window", size), &size, |b, &size| {
            let times = scattered_times(size, 0.1);
            b.iter_batched(
                || {
                    let clock = ManualClock::new();
                    let mut sched = scheduler(&clock);
                    let hits = Rc::new(Cell::new(0u32));
                    for (i, &t) in times.iter().enumerate() {
                        let hits = Rc::clone(&hits);
                        sched.insert(t, move |_, e| hits.set(hits.get() + e.args), i as u32);
                    }
                    (sched, hits)
                },
                |(mut sched, hits)| {
                    sched.tick();
                    black_box(hits.get())
                },
                BatchSize::SmallInput,
            )
        });

        // A long queue where each tick only takes a few entries off the front
        group.bench_with_input(BenchmarkId::new("sparse_window", size), &size, |b, &size| {
            let times = scattered_times(size, 60.0);
            b.iter_batched(
                || {
                    let clock = ManualClock::new();
                    let mut sched = scheduler(&clock);
                    for (i, &t) in times.iter().enumerate() {
                        sched.insert(t, |_, _| {}, i as u32);
                    }
                    sched
                },
                |mut sched| {
                    sched.tick();
                    black_box(sched.len())
                },
                BatchSize::SmallInput,
            )
        });
    }

    // Observer fan-out with an empty queue
    group.bench_function("observers_only", |b| {
        let clock = ManualClock::new();
        let mut sched = scheduler(&clock);
        let seen = Rc::new(Cell::new(0u64));
        for _ in 0..8 {
            let seen = Rc::clone(&seen);
            sched.subscribe(move |n| {
                if let Notification::Processed { .. } = n {
                    seen.set(seen.get() + 1);
                }
            });
        }
        b.iter(|| {
            clock.advance(0.025);
            sched.tick();
        });
        black_box(seen.get());
    });

    group.finish();
}
