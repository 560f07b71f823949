//! Audio clock backed by a rendered-frame counter.
//!
//! The output callback owns a [`FrameCounter`] and bumps it after each block;
//! the scheduler thread reads the same counter through [`FrameClock`]. Time is
//! `frames / sample_rate`, so it advances in block-sized steps exactly like a
//! hardware audio clock does.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::Clock;

/// Writer half, lives on the audio thread.
#[derive(Debug)]
pub struct FrameCounter {
    frames: Arc<AtomicU64>,
}

impl FrameCounter {
    /// Record that `frames` more frames were handed to the device.
    #[inline]
    pub fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::Release);
    }

    /// Frames rendered so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }
}

/// Reader half, handed to the scheduler.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frames: Arc<AtomicU64>,
    sample_rate: f64,
}

impl FrameClock {
    /// Create a linked clock/counter pair for a stream at `sample_rate` Hz.
    pub fn new(sample_rate: f64) -> (Self, FrameCounter) {
        let frames = Arc::new(AtomicU64::new(0));
        let clock = Self {
            frames: Arc::clone(&frames),
            sample_rate,
        };
        (clock, FrameCounter { frames })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Frame index at which a logical time in seconds falls.
    pub fn time_to_frame(&self, time: f64) -> u64 {
        (time * self.sample_rate).round().max(0.0) as u64
    }
}

impl Clock for FrameClock {
    fn current_time(&self) -> f64 {
        self.frames() as f64 / self.sample_rate
    }
}
