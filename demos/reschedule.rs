//! A callback that keeps rescheduling itself, one window at a time.
//!
//! Runs on a manual clock and timer so the output is the same on every run.

use std::time::Duration;

use saavy_sched::{
    clock::ManualClock, normalize::Millis, timer::ManualTimer, Dispatch, Scheduler,
};

const STEP: Duration = Duration::from_millis(25);

fn pulse(sched: &mut Scheduler<u32>, e: Dispatch<u32>) {
    println!(
        "  pulse {:>2} at {:.3}s (clock {:.3}s)",
        e.args,
        e.playback_time,
        sched.current_time()
    );
    if e.args < 9 {
        sched.next_tick(pulse, e.args + 1);
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Reschedule ===\n");

    let clock = ManualClock::new();
    let timer = ManualTimer::new();
    let mut sched: Scheduler<u32> = Scheduler::builder()
        .clock(clock.clone())
        .timer(timer.clone())
        .normalizer(Millis)
        .build()?;

    sched.subscribe(|n| println!("{}", n));

    // a one-off entry alongside the pulse chain, in milliseconds
    sched.insert(
        330.0,
        |_, e| println!("  one-off at {:.3}s", e.playback_time),
        0,
    );
    sched.start_with(pulse, 0);

    while sched.is_running() {
        clock.advance(STEP.as_secs_f64());
        timer.advance(STEP);
        sched.poll();

        if sched.is_empty() {
            sched.stop(false);
        }
    }

    println!("\nstopped at {:.3}s", sched.current_time());
    Ok(())
}
