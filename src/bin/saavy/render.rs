//! Click renderer - runs in the audio callback
//!
//! Pops timed clicks forwarded by the scheduler and starts each one on the
//! exact frame its playback time falls on, then advances the shared frame
//! counter so the scheduler's clock moves with the device.

use std::f32::consts::TAU;

use rtrb::Producer;
use saavy_sched::{
    clock::{FrameClock, FrameCounter},
    engine::forward::TimedReceiver,
};

use super::sequencer::Click;

/// Maximum overlapping clicks; extra ones are dropped rather than allocating
const MAX_VOICES: usize = 16;
/// Click length in seconds
const CLICK_SECONDS: f32 = 0.03;
/// Exponential decay rate of the click envelope
const DECAY: f32 = 150.0;

const ACCENT_HZ: f32 = 1760.0;
const BEAT_HZ: f32 = 880.0;

/// A single sounding click
#[derive(Debug, Clone, Copy)]
struct Voice {
    /// Absolute frame the click starts on
    start: u64,
    /// Frames rendered so far
    pos: u32,
    freq: f32,
    gain: f32,
}

impl Voice {
    fn new(start: u64, click: Click) -> Self {
        let (freq, gain) = if click.accent {
            (ACCENT_HZ, 0.6)
        } else {
            (BEAT_HZ, 0.4)
        };
        Self {
            start,
            pos: 0,
            freq,
            gain,
        }
    }

    #[inline]
    fn next(&mut self, sample_rate: f32) -> f32 {
        let t = self.pos as f32 / sample_rate;
        self.pos += 1;
        (TAU * self.freq * t).cos() * self.gain * (-t * DECAY).exp()
    }

    fn finished(&self, sample_rate: f32) -> bool {
        self.pos as f32 >= CLICK_SECONDS * sample_rate
    }
}

pub struct ClickRenderer<R> {
    rx: R,
    clock: FrameClock,
    counter: FrameCounter,
    voices: Vec<Voice>,
    /// Mono copy of the output for the oscilloscope
    scope: Option<Producer<f32>>,
}

impl<R: TimedReceiver<Click>> ClickRenderer<R> {
    pub fn new(rx: R, clock: FrameClock, counter: FrameCounter) -> Self {
        Self {
            rx,
            clock,
            counter,
            voices: Vec::with_capacity(MAX_VOICES),
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: Producer<f32>) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Fill an interleaved output buffer and advance the frame counter.
    pub fn render(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let frames = data.len() / channels;
        let block_start = self.counter.frames();
        let sample_rate = self.clock.sample_rate() as f32;

        while let Some(timed) = self.rx.pop() {
            if self.voices.len() < MAX_VOICES {
                let start = self.clock.time_to_frame(timed.time);
                self.voices.push(Voice::new(start, timed.value));
            }
        }

        for (i, frame) in data.chunks_mut(channels).take(frames).enumerate() {
            let now = block_start + i as u64;
            let mut sample = 0.0;
            for voice in self.voices.iter_mut() {
                // late clicks start at the top of the block
                if now >= voice.start && !voice.finished(sample_rate) {
                    sample += voice.next(sample_rate);
                }
            }

            frame.fill(sample);
            if let Some(scope) = self.scope.as_mut() {
                let _ = scope.push(sample);
            }
        }

        self.voices.retain(|v| !v.finished(sample_rate));
        self.counter.advance(frames);
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;
    use saavy_sched::engine::forward::Timed;

    const ACCENT: Click = Click {
        beat: 0,
        accent: true,
    };

    fn renderer(sample_rate: f64) -> (ClickRenderer<rtrb::Consumer<Timed<Click>>>, Producer<Timed<Click>>) {
        let (tx, rx) = RingBuffer::new(8);
        let (clock, counter) = FrameClock::new(sample_rate);
        (ClickRenderer::new(rx, clock, counter), tx)
    }

    #[test]
    fn test_click_starts_on_its_frame() {
        let (mut r, mut tx) = renderer(1000.0);
        tx.push(Timed { time: 0.01, value: ACCENT }).unwrap();

        let mut out = vec![0.0; 32];
        r.render(&mut out, 1);

        assert!(out[..10].iter().all(|&s| s == 0.0));
        assert!((out[10] - 0.6).abs() < 1e-6);
        assert_eq!(r.clock.frames(), 32);
    }

    #[test]
    fn test_click_in_a_later_block_waits() {
        let (mut r, mut tx) = renderer(1000.0);
        tx.push(Timed { time: 0.04, value: ACCENT }).unwrap();

        let mut out = vec![0.0; 32];
        r.render(&mut out, 1);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(r.active_voices(), 1);

        r.render(&mut out, 1);
        assert!(out[..8].iter().all(|&s| s == 0.0));
        assert!(out[8] > 0.0);
    }

    #[test]
    fn test_late_click_starts_immediately() {
        let (mut r, mut tx) = renderer(1000.0);
        let mut out = vec![0.0; 16];
        r.render(&mut out, 1);

        tx.push(Timed { time: 0.002, value: ACCENT }).unwrap();
        r.render(&mut out, 1);
        assert!((out[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_interleaved_channels_and_voice_cleanup() {
        let (mut r, mut tx) = renderer(1000.0);
        tx.push(Timed { time: 0.0, value: Click { beat: 1, accent: false } })
            .unwrap();

        let mut out = vec![0.0; 64];
        r.render(&mut out, 2);
        assert_eq!(out[0], out[1]);
        assert!((out[0] - 0.4).abs() < 1e-6);
        assert_eq!(r.clock.frames(), 32);
        // 30ms at 1kHz is finished after one 32-frame block
        assert_eq!(r.active_voices(), 0);
    }

    #[test]
    fn test_scope_receives_mono_samples() {
        let (r, mut tx) = renderer(1000.0);
        let (scope_tx, mut scope_rx) = RingBuffer::new(64);
        let mut r = r.with_scope(scope_tx);
        tx.push(Timed { time: 0.0, value: ACCENT }).unwrap();

        let mut out = vec![0.0; 16];
        r.render(&mut out, 2);

        let mut seen = 0;
        while scope_rx.pop().is_ok() {
            seen += 1;
        }
        assert_eq!(seen, 8);
    }
}
