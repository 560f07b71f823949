//! Offline run of the scheduler against a simulated audio clock.
//!
//! Notes are scheduled in musical ticks, forwarded through the ring and
//! placed on frames the way an output callback would place them.

use std::time::Duration;

use saavy_sched::{
    clock::FrameClock,
    engine::forward::{Forwarder, TimedReceiver},
    normalize::Ticks,
    timer::ManualTimer,
    Scheduler,
};

const SAMPLE_RATE: f64 = 48_000.0;
const BLOCK: usize = 512;
const PPQ: u32 = 480;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Offline Clicks ===\n");

    let (clock, counter) = FrameClock::new(SAMPLE_RATE);
    let timer = ManualTimer::new();
    let mut sched: Scheduler<u8> = Scheduler::builder()
        .clock(clock.clone())
        .timer(timer.clone())
        .normalizer(Ticks::new(120.0, PPQ))
        .build()?;

    let (forwarder, mut rx) = Forwarder::new(32);

    // One bar of eighth notes, accent on the downbeat
    for step in 0..8u8 {
        let note = if step == 0 { 84 } else { 72 };
        forwarder.schedule(&mut sched, (step as u32 * PPQ / 2) as f64, note);
    }
    sched.start();

    let block_time = Duration::from_secs_f64(BLOCK as f64 / SAMPLE_RATE);
    let mut rendered = 0;

    while rendered < 8 {
        // the host loop: wake on the timer, then let the device consume a block
        timer.advance(block_time);
        sched.poll();

        let block_start = counter.frames();
        while let Some(timed) = TimedReceiver::pop(&mut rx) {
            let frame = clock.time_to_frame(timed.time);
            println!(
                "note {:>3} at {:.4}s -> frame {:>6} ({:>5} frames ahead)",
                timed.value,
                timed.time,
                frame,
                frame.saturating_sub(block_start)
            );
            rendered += 1;
        }

        counter.advance(BLOCK);
    }

    sched.stop(true);
    println!(
        "\nRendered {} blocks, clock at {:.3}s, {} dropped",
        counter.frames() / BLOCK as u64,
        clock.frames() as f64 / SAMPLE_RATE,
        forwarder.dropped()
    );

    Ok(())
}
