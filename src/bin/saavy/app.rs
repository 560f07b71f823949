//! Metronome - application builder and runner

use std::cell::Cell;
use std::rc::Rc;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use saavy_sched::{
    clock::FrameClock, engine::forward::Forwarder, timer::IntervalTimer, Notification,
    Scheduler, DEFAULT_AHEAD_TIME, DEFAULT_INTERVAL,
};

use super::render::ClickRenderer;
use super::sequencer::{Click, Sequencer};
use super::ui::UiApp;

/// Clicks in flight between the scheduler and the audio thread
const CLICK_RING: usize = 64;
/// Samples kept for the oscilloscope
const SCOPE_RING: usize = 8192;

/// Main application builder
pub struct Metronome {
    bpm: f64,
    beats_per_bar: u32,
    latency: f64,
    interval: f64,
    ahead_time: f64,
}

impl Metronome {
    pub fn new() -> Self {
        Self {
            bpm: 120.0,
            beats_per_bar: 4,
            latency: 0.0,
            interval: DEFAULT_INTERVAL,
            ahead_time: DEFAULT_AHEAD_TIME,
        }
    }

    /// Set the tempo in beats per minute
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// Accent every `beats`th click
    pub fn beats_per_bar(mut self, beats: u32) -> Self {
        self.beats_per_bar = beats.max(1);
        self
    }

    /// Fixed output latency added to every click, in seconds
    #[allow(dead_code)]
    pub fn latency(mut self, seconds: f64) -> Self {
        self.latency = seconds;
        self
    }

    /// Scheduler polling period and window, in seconds
    #[allow(dead_code)]
    pub fn timing(mut self, interval: f64, ahead_time: f64) -> Self {
        self.interval = interval;
        self.ahead_time = ahead_time;
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f64;
        let channels = config.channels() as usize;

        // The frame counter is the scheduler's clock: time is what the device has consumed
        let (clock, counter) = FrameClock::new(sample_rate);
        let (forwarder, click_rx) = Forwarder::<Click>::new(CLICK_RING);
        let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING);

        let mut renderer = ClickRenderer::new(click_rx, clock.clone(), counter).with_scope(scope_tx);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| renderer.render(data, channels),
                |err| tracing::error!(%err, "audio stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        let mut sched: Scheduler<Click> = Scheduler::builder()
            .clock(clock)
            .timer(IntervalTimer::new())
            .interval(self.interval)
            .ahead_time(self.ahead_time)
            .offset_time(self.latency)
            .build()
            .wrap_err("invalid scheduler timing")?;

        let ticks = Rc::new(Cell::new(0u64));
        let counted = Rc::clone(&ticks);
        sched.subscribe(move |n| {
            if let Notification::Processed { .. } = n {
                counted.set(counted.get() + 1);
            }
        });

        let sequencer = Sequencer::new(self.bpm, self.beats_per_bar, forwarder);
        sequencer.play(&mut sched);

        let mut terminal = ratatui::init();
        let result = UiApp::new(sched, sequencer, scope_rx, ticks, sample_rate).run(&mut terminal);
        ratatui::restore();

        drop(stream);
        result
    }
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new()
    }
}
