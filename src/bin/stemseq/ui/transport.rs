//! Transport bar: tempo, play state, position and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use stemseq::sequencing::time::BEATS_PER_BAR;

use super::View;

pub fn render_transport(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::default().title(" stemseq ").borders(Borders::ALL);

    let position = view.loop_position();
    let bar = position.floor() as u64 + 1;
    let beat = (position.fract() * BEATS_PER_BAR as f64).floor() as u64 + 1;

    let (symbol, state, color) = if view.playing {
        ("▶", "Playing", Color::Green)
    } else {
        ("■", "Stopped", Color::Yellow)
    };

    let line = Line::from(vec![
        Span::styled(format!(" BPM: {:.0}  ", view.bpm), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{symbol} {state}  "), Style::default().fg(color)),
        Span::styled(
            format!("Bar {bar}/{} | Beat {beat}  ", view.loop_bars.max(1)),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", view.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("Peak: {:.2}", view.peak), Style::default().fg(Color::Magenta)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
