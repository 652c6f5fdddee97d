//! TUI widgets for the stemseq host
//!
//! Everything here renders a [`View`] snapshot taken once per frame; no
//! widget talks to the engine directly.

mod tracks;
mod transport;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use stemseq::Track;

use tracks::render_tracks;
use transport::render_transport;

/// Per-frame snapshot of the player and arrangement.
pub struct View<'a> {
    pub playing: bool,
    /// Unwrapped bar position as reported by the transport.
    pub bar: f64,
    pub loop_bars: u64,
    pub bpm: f64,
    pub peak: f32,
    pub sample_rate: f32,
    pub tracks: &'a [Track],
    pub selected: usize,
}

impl View<'_> {
    /// Playhead folded into the arrangement loop.
    pub fn loop_position(&self) -> f64 {
        if self.loop_bars == 0 {
            0.0
        } else {
            self.bar.rem_euclid(self.loop_bars as f64)
        }
    }
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Min(4),    // Arrangement
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_transport(frame, chunks[0], view);

    let arrangement = Block::default().title(" Arrangement ").borders(Borders::ALL);
    let inner = arrangement.inner(chunks[1]);
    frame.render_widget(arrangement, chunks[1]);
    render_tracks(frame, inner, view);

    let help = Paragraph::new(
        " [Space] Play/Stop  [R] Reset  [↑↓] Track  [M] Mute  [S] Solo  [ [ ] ] Volume  [+/-] Tempo  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}
