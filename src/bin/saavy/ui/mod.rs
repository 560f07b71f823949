//! TUI module for saavy
//!
//! The UI loop is also the scheduler's host loop: every pass polls the
//! scheduler, so beats are dispatched between redraws and key reads.

pub mod state;
mod timeline;
mod transport;
mod waveform;

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use saavy_sched::Scheduler;

use crate::sequencer::{Click, Sequencer};

pub use state::UiState;

use timeline::render_timeline;
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Samples kept for the oscilloscope
const SCOPE_SIZE: usize = 1024;
/// How long a key read may block; bounds the scheduler's polling latency
const INPUT_POLL: Duration = Duration::from_millis(2);
const FRAME_TIME: Duration = Duration::from_millis(16);
const BPM_STEP: f64 = 5.0;

pub struct UiApp {
    sched: Scheduler<Click>,
    sequencer: Sequencer,
    /// Mono samples from the audio thread
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    /// Completed scheduler ticks
    ticks: Rc<Cell<u64>>,
    sample_rate: f64,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        sched: Scheduler<Click>,
        sequencer: Sequencer,
        scope_rx: Consumer<f32>,
        ticks: Rc<Cell<u64>>,
        sample_rate: f64,
    ) -> Self {
        Self {
            sched,
            sequencer,
            scope_rx,
            scope: vec![0.0; SCOPE_SIZE],
            ticks,
            sample_rate,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut last_draw: Option<Instant> = None;

        while !self.should_quit {
            self.sched.poll();
            self.poll_scope();

            if last_draw.map_or(true, |at| at.elapsed() >= FRAME_TIME) {
                let state = UiState::capture(
                    &self.sched,
                    &self.sequencer,
                    self.ticks.get(),
                    self.sample_rate,
                );
                terminal.draw(|frame| self.render(frame, &state))?;
                last_draw = Some(Instant::now());
            }

            if event::poll(INPUT_POLL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.sched.stop(true);
        Ok(())
    }

    /// Keep the last `SCOPE_SIZE` samples
    fn poll_scope(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() > SCOPE_SIZE {
            let excess = self.scope.len() - SCOPE_SIZE;
            self.scope.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.sequencer.toggle(&mut self.sched),
            KeyCode::Char('r') | KeyCode::Char('R') => self.sequencer.reset(&mut self.sched),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                self.sequencer.nudge_bpm(BPM_STEP)
            }
            KeyCode::Char('-') | KeyCode::Down => self.sequencer.nudge_bpm(-BPM_STEP),
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame, state: &UiState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Min(6),    // Queue timeline
                Constraint::Length(8), // Oscilloscope
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let stats = AudioStats::from_buffer(&self.scope);
        render_transport(frame, chunks[0], state, &stats);

        let timeline_block = Block::default().title(" Queue ").borders(Borders::ALL);
        let timeline_inner = timeline_block.inner(chunks[1]);
        frame.render_widget(timeline_block, chunks[1]);
        render_timeline(frame, timeline_inner, state);

        render_waveform(frame, chunks[2], &self.scope);

        let help = Paragraph::new(" [Q] Quit  [Space] Start/Stop  [R] Reset  [+/-] Tempo")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
