//! Benchmarks for ordered insertion, removal by id and window draining.

use std::hint::black_box;
use std::rc::Rc;

use criterion::{BatchSize, BenchmarkId, Criterion};
use saavy_sched::engine::{Callback, EventQueue};
use saavy_sched::{Dispatch, Scheduler};

use super::scattered_times;
use crate::QUEUE_SIZES;

fn noop() -> Callback<u32> {
    Rc::new(|_: &mut Scheduler<u32>, _: Dispatch<u32>| {})
}

fn filled(times: &[f64]) -> EventQueue<u32> {
    let callback = noop();
    let mut queue = EventQueue::new();
    for (i, &t) in times.iter().enumerate() {
        queue.insert(t, Rc::clone(&callback), i as u32);
    }
    queue
}

pub fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/insert");

    for &size in QUEUE_SIZES {
        let ascending: Vec<f64> = (0..size).map(|i| i as f64 * 0.01).collect();
        let descending: Vec<f64> = ascending.iter().rev().copied().collect();
        let scattered = scattered_times(size, size as f64 * 0.01);

        // Appending: each insert lands at the back
        group.bench_with_input(BenchmarkId::new("ascending", size), &ascending, |b, times| {
            b.iter(|| black_box(filled(black_box(times))))
        });

        // Worst case for a deque: each insert lands at the front
        group.bench_with_input(BenchmarkId::new("descending", size), &descending, |b, times| {
            b.iter(|| black_box(filled(black_box(times))))
        });

        group.bench_with_input(BenchmarkId::new("scattered", size), &scattered, |b, times| {
            b.iter(|| black_box(filled(black_box(times))))
        });
    }

    group.finish();
}

pub fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/remove");

    for &size in QUEUE_SIZES {
        let times = scattered_times(size, 10.0);

        group.bench_with_input(BenchmarkId::new("by_id", size), &times, |b, times| {
            b.iter_batched(
                || {
                    let queue = filled(times);
                    let ids: Vec<_> = queue.iter().map(|e| e.id).collect();
                    (queue, ids)
                },
                |(mut queue, ids)| {
                    // every other entry, from the middle outwards
                    for id in ids.iter().skip(size / 2).step_by(2) {
                        queue.remove_by_id(*id);
                    }
                    black_box(queue.len())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

pub fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/drain");

    for &size in QUEUE_SIZES {
        let times = scattered_times(size, 10.0);

        // The first 100ms of a 10s queue, as one tick sees it
        group.bench_with_input(BenchmarkId::new("window", size), &times, |b, times| {
            b.iter_batched(
                || filled(times),
                |mut queue| black_box(queue.due_before(black_box(0.1)).count()),
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("everything", size), &times, |b, times| {
            b.iter_batched(
                || filled(times),
                |mut queue| black_box(queue.due_before(f64::INFINITY).count()),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}
