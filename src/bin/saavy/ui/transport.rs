//! Transport bar widget - shows BPM, run state, position, clock and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiState;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, state: &UiState, stats: &AudioStats) {
    let block = Block::default().title(" saavy ").borders(Borders::ALL);

    let (bar, beat) = state.bar_and_beat();
    let (symbol, color) = if state.is_running() {
        ("▶", Color::Green)
    } else {
        ("⏸", Color::Yellow)
    };

    let mut spans = vec![
        Span::styled(
            format!(" BPM: {:.0}  ", state.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{} {}  ", symbol, state.state), Style::default().fg(color)),
        Span::styled(
            format!("Bar {} | Beat {}  ", bar, beat),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "clock {:.3}s  window {:.3}s  ",
                state.current_time, state.playback_time
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("ticks {}  ", state.ticks),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}kHz  ", state.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ];

    if state.dropped > 0 {
        spans.push(Span::styled(
            format!("  dropped {}", state.dropped),
            Style::default().fg(Color::Red),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
