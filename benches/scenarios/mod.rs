//! Scenario benchmarks.
//!
//! Whole scheduler ticks on a manual clock, shaped like the hosts in the
//! demos: dense one-off entries, and a self-rescheduling beat forwarded
//! through the ring.

mod forward;
mod tick;

pub use forward::bench_forward;
pub use tick::bench_tick;
