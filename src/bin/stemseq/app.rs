//! Live playback: cpal device, timer-driven player and the TUI loop

use std::time::Duration;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::info;
use ratatui::DefaultTerminal;

use stemseq::{
    device::{self, CpalDevice, OutputStream},
    AudioDevice, DeviceConfig, Engine, EngineConfig, Player, Track,
};

use super::{demo, ui};

const BPM_STEP: f64 = 5.0;
const VOLUME_STEP: f32 = 0.1;

pub fn run(bpm: f64) -> EyreResult<()> {
    let (device, stream) =
        device::open(&DeviceConfig::default()).wrap_err("failed to open audio output")?;
    let sample_rate = device.sample_rate();
    let player = Player::new(Engine::new(device, EngineConfig::default().bpm(bpm)));

    let mut app = App::new(player, stream, demo::project(), sample_rate);
    app.player.start(0.0).wrap_err("failed to start playback")?;

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

struct App {
    player: Player<CpalDevice>,
    stream: OutputStream,
    tracks: Vec<Track>,
    selected: usize,
    /// Bar to resume from after a reset while stopped.
    cue: Option<f64>,
    sample_rate: f32,
    should_quit: bool,
}

impl App {
    fn new(player: Player<CpalDevice>, stream: OutputStream, tracks: Vec<Track>, sample_rate: f32) -> Self {
        player.set_tracks(tracks.clone());
        Self {
            player,
            stream,
            tracks,
            selected: 0,
            cue: None,
            sample_rate,
            should_quit: false,
        }
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, &self.view()))?;

            // ~60fps redraw; the playhead is polled each frame
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code)?;
                    }
                }
            }
        }
        self.player.stop();
        Ok(())
    }

    fn view(&self) -> ui::View<'_> {
        let playing = self.player.is_playing();
        let bar = match (playing, self.cue) {
            (false, Some(cue)) => cue,
            _ => self.player.current_bar(),
        };
        ui::View {
            playing,
            bar,
            loop_bars: self.player.with_engine(|e| e.loop_bars()),
            bpm: self.player.bpm(),
            peak: self.stream.peak(),
            sample_rate: self.sample_rate,
            tracks: &self.tracks,
            selected: self.selected,
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> EyreResult<()> {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                if self.player.is_playing() {
                    self.player.stop();
                } else {
                    let bar = self.cue.take().unwrap_or_else(|| self.player.current_bar());
                    self.player.start(bar).wrap_err("failed to resume playback")?;
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.player.is_playing() {
                    self.player.start(0.0).wrap_err("failed to restart playback")?;
                } else {
                    self.cue = Some(0.0);
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(self.tracks.len().saturating_sub(1))
            }
            KeyCode::Char('m') | KeyCode::Char('M') => self.edit_track(|t| t.muted = !t.muted),
            KeyCode::Char('s') | KeyCode::Char('S') => self.edit_track(|t| t.soloed = !t.soloed),
            KeyCode::Char('[') => {
                self.edit_track(|t| t.volume = (t.volume - VOLUME_STEP).max(0.0))
            }
            KeyCode::Char(']') => {
                self.edit_track(|t| t.volume = (t.volume + VOLUME_STEP).min(1.0))
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.player.set_bpm(self.player.bpm() + BPM_STEP)
            }
            KeyCode::Char('-') => self.player.set_bpm((self.player.bpm() - BPM_STEP).max(BPM_STEP)),
            _ => {}
        }
        Ok(())
    }

    fn edit_track(&mut self, edit: impl FnOnce(&mut Track)) {
        if let Some(track) = self.tracks.get_mut(self.selected) {
            edit(track);
            info!(
                "track '{}': volume {:.1}, muted {}, soloed {}",
                track.name, track.volume, track.muted, track.soloed
            );
            self.player.set_tracks(self.tracks.clone());
        }
    }
}
