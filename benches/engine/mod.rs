//! Benchmarks for the event queue.

mod queue;

pub use queue::{bench_drain, bench_insert, bench_remove};

/// Deterministic pseudo-random times in `[0, span)`.
pub fn scattered_times(count: usize, span: f64) -> Vec<f64> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64 * span
        })
        .collect()
}
