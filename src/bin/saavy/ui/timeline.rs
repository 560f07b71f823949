//! Timeline widget - pending beats against the lookahead window

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::UiState;

/// Seconds of future shown across the width of the timeline
const HORIZON: f64 = 2.0;

/// Render the horizon row and the list of queued beats
pub fn render_timeline(frame: &mut Frame, area: Rect, state: &UiState) {
    if area.height < 2 || area.width < 20 {
        return;
    }

    let label_width = 8u16;
    let width = area.width.saturating_sub(label_width + 2) as usize;
    let chars_per_second = width as f64 / HORIZON;
    let column = |time: f64| ((time - state.current_time) * chars_per_second).floor();

    let window_end = column(state.current_time + state.ahead_time).max(1.0) as usize;

    // Horizon row: the dispatch window is shaded, queued beats are marked
    let mut row: Vec<char> = (0..width)
        .map(|i| if i < window_end { '▒' } else { '░' })
        .collect();
    for pending in &state.pending {
        let col = column(pending.time);
        if col >= 0.0 && (col as usize) < width {
            row[col as usize] = if pending.click.accent { '█' } else { '▓' };
        }
    }

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{:<width$}", "queue", width = label_width as usize),
                Style::default().fg(Color::White),
            ),
            Span::styled(row.into_iter().collect::<String>(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            format!(
                "{:<width$}now{:>pad$}",
                "",
                format!("+{:.1}s", HORIZON),
                width = label_width as usize,
                pad = width.saturating_sub(3),
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let rows = area.height.saturating_sub(2) as usize;
    for pending in state.pending.iter().take(rows) {
        let delta = pending.time - state.current_time;
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<width$}", format!("#{}", pending.click.beat), width = label_width as usize),
                Style::default().fg(if pending.click.accent {
                    Color::Yellow
                } else {
                    Color::White
                }),
            ),
            Span::styled(
                format!("@ {:.3}s  (in {:+.3}s)", pending.time, delta),
                Style::default().fg(if delta < state.ahead_time {
                    Color::Green
                } else {
                    Color::DarkGray
                }),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
