//! Per-frame snapshot of what the UI shows
//!
//! The scheduler lives on the UI thread, so the snapshot is read straight
//! from it each frame instead of being shipped over a ring.

use saavy_sched::{Scheduler, State};

use crate::sequencer::{Click, Sequencer};

/// A beat waiting in the scheduler queue
#[derive(Clone, Copy, Debug)]
pub struct PendingClick {
    pub time: f64,
    pub click: Click,
}

#[derive(Clone, Debug)]
pub struct UiState {
    pub state: State,
    pub bpm: f64,
    pub beats_per_bar: u32,
    /// Beats forwarded since the last reset
    pub beats: u64,
    /// Clock time in seconds
    pub current_time: f64,
    /// Start of the most recent window
    pub playback_time: f64,
    pub ahead_time: f64,
    /// Ticks run since launch
    pub ticks: u64,
    pub dropped: u64,
    pub sample_rate: f64,
    pub pending: Vec<PendingClick>,
}

impl UiState {
    pub fn capture(
        sched: &Scheduler<Click>,
        sequencer: &Sequencer,
        ticks: u64,
        sample_rate: f64,
    ) -> Self {
        Self {
            state: sched.state(),
            bpm: sequencer.bpm(),
            beats_per_bar: sequencer.beats_per_bar(),
            beats: sequencer.beats(),
            current_time: sched.current_time(),
            playback_time: sched.playback_time(),
            ahead_time: sched.ahead_time(),
            ticks,
            dropped: sequencer.dropped(),
            sample_rate,
            pending: sched
                .pending()
                .map(|e| PendingClick {
                    time: e.time,
                    click: e.args,
                })
                .collect(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// 1-based bar and beat of the last click heard
    pub fn bar_and_beat(&self) -> (u64, u64) {
        let last = self.beats.saturating_sub(1);
        let per_bar = self.beats_per_bar.max(1) as u64;
        (last / per_bar + 1, last % per_bar + 1)
    }
}
