//! Sequencer - beat generation on the control thread
//!
//! Each beat is a scheduler entry whose callback forwards a [`Click`] to the
//! audio thread and queues the next beat one period later. The chain stops
//! when the scheduler is reset and is started again from the current clock
//! time.

use std::cell::Cell;
use std::rc::Rc;

use saavy_sched::{
    engine::{forward::Forwarder, Callback},
    Dispatch, Scheduler,
};

const MIN_BPM: f64 = 20.0;
const MAX_BPM: f64 = 300.0;

/// One metronome click, as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    /// Beat number since the last reset
    pub beat: u64,
    /// First beat of a bar
    pub accent: bool,
}

struct Pulse {
    bpm: Cell<f64>,
    beats_per_bar: u32,
    /// Beats forwarded since the last reset
    beats: Cell<u64>,
    forward: Callback<Click>,
}

impl Pulse {
    fn period(&self) -> f64 {
        60.0 / self.bpm.get()
    }

    fn click(&self, beat: u64) -> Click {
        Click {
            beat,
            accent: beat % self.beats_per_bar as u64 == 0,
        }
    }
}

fn on_beat(pulse: Rc<Pulse>) -> Callback<Click> {
    Rc::new(move |sched: &mut Scheduler<Click>, e: Dispatch<Click>| {
        // logical time of this beat, without the output latency
        let time = e.playback_time - sched.offset_time();
        let beat = e.args.beat;

        (pulse.forward)(sched, e);
        pulse.beats.set(beat + 1);

        let next = pulse.click(beat + 1);
        sched.insert_callback(time + pulse.period(), on_beat(Rc::clone(&pulse)), next);
    })
}

pub struct Sequencer {
    pulse: Rc<Pulse>,
    forwarder: Forwarder<Click>,
}

impl Sequencer {
    pub fn new(bpm: f64, beats_per_bar: u32, forwarder: Forwarder<Click>) -> Self {
        let forward: Callback<Click> = Rc::new(forwarder.callback());
        let pulse = Pulse {
            bpm: Cell::new(bpm.clamp(MIN_BPM, MAX_BPM)),
            beats_per_bar: beats_per_bar.max(1),
            beats: Cell::new(0),
            forward,
        };
        Self {
            pulse: Rc::new(pulse),
            forwarder,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.pulse.bpm.get()
    }

    /// Change the tempo; takes effect from the next queued beat onwards.
    pub fn set_bpm(&self, bpm: f64) {
        self.pulse.bpm.set(bpm.clamp(MIN_BPM, MAX_BPM));
    }

    pub fn nudge_bpm(&self, delta: f64) {
        self.set_bpm(self.bpm() + delta);
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.pulse.beats_per_bar
    }

    pub fn beats(&self) -> u64 {
        self.pulse.beats.get()
    }

    /// Clicks lost because the audio thread fell behind
    pub fn dropped(&self) -> u64 {
        self.forwarder.dropped()
    }

    /// Start the scheduler with the next beat at the current clock time.
    pub fn play(&self, sched: &mut Scheduler<Click>) {
        if sched.is_running() {
            return;
        }
        let first = self.pulse.click(self.beats());
        let beat = on_beat(Rc::clone(&self.pulse));
        sched.start_with(move |s, e| beat(s, e), first);
    }

    /// Stop and drop the queued beat; the count is kept.
    pub fn pause(&self, sched: &mut Scheduler<Click>) {
        sched.stop(true);
    }

    pub fn toggle(&self, sched: &mut Scheduler<Click>) {
        if sched.is_running() {
            self.pause(sched);
        } else {
            self.play(sched);
        }
    }

    /// Stop and rewind to beat zero.
    pub fn reset(&self, sched: &mut Scheduler<Click>) {
        sched.stop(true);
        self.pulse.beats.set(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::Consumer;
    use saavy_sched::{
        clock::ManualClock,
        engine::forward::{Timed, TimedReceiver},
        timer::ManualTimer,
    };
    use std::time::Duration;

    type Rig = (
        Scheduler<Click>,
        Sequencer,
        ManualClock,
        ManualTimer,
        Consumer<Timed<Click>>,
    );

    fn rig(bpm: f64) -> Rig {
        let clock = ManualClock::new();
        let timer = ManualTimer::new();
        let sched = Scheduler::builder()
            .clock(clock.clone())
            .timer(timer.clone())
            .build()
            .unwrap();
        let (forwarder, rx) = Forwarder::new(16);
        (sched, Sequencer::new(bpm, 4, forwarder), clock, timer, rx)
    }

    #[test]
    fn test_play_forwards_first_beat_immediately() {
        let (mut sched, seq, _clock, _timer, mut rx) = rig(120.0);

        seq.play(&mut sched);

        let first = TimedReceiver::pop(&mut rx).unwrap();
        assert_eq!(first.time, 0.0);
        assert_eq!(first.value, Click { beat: 0, accent: true });
        assert_eq!(seq.beats(), 1);

        // next beat waits half a second out
        let pending: Vec<f64> = sched.pending().map(|e| e.time).collect();
        assert_eq!(pending, vec![0.5]);
    }

    #[test]
    fn test_beats_follow_the_clock() {
        let (mut sched, seq, clock, timer, mut rx) = rig(240.0);
        seq.play(&mut sched);

        for _ in 0..40 {
            clock.advance(0.025);
            timer.advance(Duration::from_millis(25));
            sched.poll();
        }

        let mut clicks = Vec::new();
        while let Some(c) = TimedReceiver::pop(&mut rx) {
            clicks.push(c);
        }
        // 240 bpm over one second, plus the beat inside the last window
        let beats: Vec<u64> = clicks.iter().map(|c| c.value.beat).collect();
        assert_eq!(beats, vec![0, 1, 2, 3, 4]);
        for (i, c) in clicks.iter().enumerate() {
            assert!((c.time - 0.25 * i as f64).abs() < 1e-9);
            assert_eq!(c.value.accent, i % 4 == 0);
        }
    }

    #[test]
    fn test_reset_rewinds_and_clears() {
        let (mut sched, seq, _clock, _timer, mut rx) = rig(120.0);
        seq.play(&mut sched);
        TimedReceiver::pop(&mut rx);

        seq.reset(&mut sched);
        assert!(!sched.is_running());
        assert!(sched.is_empty());
        assert_eq!(seq.beats(), 0);

        seq.toggle(&mut sched);
        assert!(sched.is_running());
        assert_eq!(TimedReceiver::pop(&mut rx).unwrap().value.beat, 0);
    }

    #[test]
    fn test_bpm_is_clamped() {
        let (_sched, seq, _clock, _timer, _rx) = rig(1000.0);
        assert_eq!(seq.bpm(), MAX_BPM);
        seq.nudge_bpm(-1000.0);
        assert_eq!(seq.bpm(), MIN_BPM);
    }
}
