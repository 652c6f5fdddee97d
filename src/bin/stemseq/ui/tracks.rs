//! Track rows: name, mix state and region blocks with a playhead

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use stemseq::{sequencing::any_soloed, Track};

use super::View;

const LABEL_WIDTH: usize = 18;

fn label(track: &Track, selected: bool) -> String {
    let marker = if selected { '>' } else { ' ' };
    let flags = match (track.muted, track.soloed) {
        (true, true) => "MS",
        (true, false) => "M ",
        (false, true) => " S",
        (false, false) => "  ",
    };
    format!("{marker}{:<8.8} {flags} {:>3.0}% ", track.name, track.volume * 100.0)
}

pub fn render_tracks(frame: &mut Frame, area: Rect, view: &View) {
    if area.height < 2 || (area.width as usize) < LABEL_WIDTH + 8 {
        return;
    }

    let width = area.width as usize - LABEL_WIDTH;
    let bars = view.loop_bars.max(1) as f64;
    let cells_per_bar = width as f64 / bars;
    let playhead = ((view.loop_position() * cells_per_bar) as usize).min(width - 1);
    let soloing = any_soloed(view.tracks);

    let mut lines = Vec::with_capacity(view.tracks.len() + 2);

    let mut ruler = " ".repeat(LABEL_WIDTH);
    for cell in 0..width {
        let bar = (cell as f64 / cells_per_bar) as u64;
        let starts_bar = (bar as f64 * cells_per_bar) as usize == cell;
        ruler.push(if starts_bar { '|' } else { ' ' });
    }
    lines.push(Line::from(Span::styled(ruler, Style::default().fg(Color::DarkGray))));

    for (index, track) in view.tracks.iter().enumerate() {
        let audible = track.is_audible(soloing);
        let mut name_style = Style::default().fg(if audible { Color::White } else { Color::DarkGray });
        if index == view.selected {
            name_style = name_style.add_modifier(Modifier::BOLD);
        }

        let blocks: String = (0..width)
            .map(|cell| {
                let bar = (cell as f64 / cells_per_bar) as u32;
                if cell == playhead {
                    '┃'
                } else if track.regions.iter().any(|r| r.contains_bar(bar)) {
                    '▓'
                } else {
                    '░'
                }
            })
            .collect();

        lines.push(Line::from(vec![
            Span::styled(label(track, index == view.selected), name_style),
            Span::styled(
                blocks,
                Style::default().fg(if audible { Color::Cyan } else { Color::DarkGray }),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
