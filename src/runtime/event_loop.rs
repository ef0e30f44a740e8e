use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::ThreadRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::{App, InputMode, LoadState, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::radio::{RadioAction, RadioPlayer};
use crate::ui::{self, WaveBanner};

use super::startup::CatalogResult;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    pub banner: WaveBanner,
    /// Pending catalog load; dropped once its result arrives.
    catalog_rx: Option<Receiver<CatalogResult>>,
    rng: ThreadRng,
}

impl EventLoopState {
    pub fn new(catalog_rx: Receiver<CatalogResult>, animations: bool) -> Self {
        let mut banner = WaveBanner::start();
        if !animations {
            banner.cancel();
        }
        Self {
            pending_gg: false,
            banner,
            catalog_rx: Some(catalog_rx),
            rng: rand::rng(),
        }
    }
}

/// The players driven by key presses.
pub struct Players<'a> {
    pub audio: &'a AudioPlayer,
    pub radio: &'a RadioPlayer,
}

/// Main terminal event loop: handles input, UI drawing and sync with the
/// audio and loader threads. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    players: &Players<'_>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let radio_status = players.radio.status_handle();

    loop {
        poll_catalog(app, state);

        app.tick(Instant::now());
        app.sync_playback();
        state.banner.tick();

        let radio = radio_status.lock().ok().map(|s| s.clone());
        terminal.draw(|f| ui::draw(f, app, &state.banner, settings, radio.as_ref()))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, players, state)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn poll_catalog(app: &mut App, state: &mut EventLoopState) {
    let Some(ref rx) = state.catalog_rx else {
        return;
    };
    match rx.try_recv() {
        Ok(result) => {
            app.catalog_loaded(result);
            if let LoadState::Ready(ref report) = app.load_state {
                info!(summary = %report.summary(), "catalog ready");
            }
            state.catalog_rx = None;
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
            app.load_state = LoadState::Failed("catalog loader stopped unexpectedly".to_string());
            state.catalog_rx = None;
        }
    }
}

fn play(app: &mut App, index: usize, players: &Players<'_>, state: &mut EventLoopState) {
    if let Some(cmd) = app.begin_playback(index, Instant::now(), &mut state.rng) {
        if let Some(track) = app.track(index) {
            info!(id = %track.id, title = %track.title, "play");
        }
        let _ = players.audio.send(cmd);
    }
}

fn apply_radio(action: Option<RadioAction>, players: &Players<'_>) {
    if let Some(action) = action {
        debug!(?action, "radio");
        players.radio.apply(action);
    }
}

fn handle_search_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.clear_query(),
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Enter => app.exit_search(),
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => app.next(),
        KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => app.prev(),
        KeyCode::Down => app.next(),
        KeyCode::Up => app.prev(),
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.push_query_char(c);
            }
        }
        _ => {}
    }
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    players: &Players<'_>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    if app.mode == InputMode::Search {
        state.pending_gg = false;
        handle_search_key(key, app);
        return Ok(false);
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => {
            players
                .audio
                .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            players.radio.quit();
            return Ok(true);
        }
        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if let Some(index) = app.activate() {
                play(app, index, players, state);
            }
        }
        KeyCode::Char('o') => app.toggle_selected_album(),
        KeyCode::Char('p') | KeyCode::Char(' ') => match app.playback {
            PlaybackState::Stopped => {
                if let Some(index) = app.selected_track() {
                    play(app, index, players, state);
                }
            }
            PlaybackState::Playing | PlaybackState::Paused => {
                let _ = players.audio.send(AudioCmd::TogglePause);
                app.playback = if app.playback == PlaybackState::Playing {
                    PlaybackState::Paused
                } else {
                    PlaybackState::Playing
                };
            }
        },
        KeyCode::Char('s') => {
            let _ = players.audio.send(AudioCmd::Stop);
            app.playback = PlaybackState::Stopped;
        }
        KeyCode::Char('l') | KeyCode::Right => {
            let secs = settings.controls.seek_seconds.min(i64::MAX as u64) as i64;
            let _ = players.audio.send(AudioCmd::SeekBy(secs));
        }
        KeyCode::Char('h') | KeyCode::Left => {
            let secs = settings.controls.seek_seconds.min(i64::MAX as u64) as i64;
            let _ = players.audio.send(AudioCmd::SeekBy(-secs));
        }
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = c.to_digit(10).unwrap_or(0);
            let _ = players.audio.send(AudioCmd::SeekTo(f64::from(tenth) / 10.0));
        }
        KeyCode::Char('-') => {
            let v = app.change_volume(-i16::from(settings.controls.volume_step));
            let _ = players.audio.send(AudioCmd::SetVolume(v));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = app.change_volume(i16::from(settings.controls.volume_step));
            let _ = players.audio.send(AudioCmd::SetVolume(v));
        }
        KeyCode::Char('[') => app.cycle_country(false),
        KeyCode::Char(']') => app.cycle_country(true),
        KeyCode::Char('{') => app.cycle_genre(false),
        KeyCode::Char('}') => app.cycle_genre(true),
        KeyCode::Char('x') => app.reset_filters(),
        KeyCode::Char('f') => {
            let now = Instant::now();
            match app.toggle_favorite() {
                Ok(Some(added)) => {
                    let title = app
                        .selected_track()
                        .and_then(|i| app.track(i))
                        .map(|t| t.title.clone())
                        .unwrap_or_default();
                    let headline = if added {
                        "Added to favorites"
                    } else {
                        "Removed from favorites"
                    };
                    app.notify("favorites", headline, title, now);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "could not save favorites");
                    app.notify("favorites", "Favorites not saved", e.to_string(), now);
                }
            }
        }
        KeyCode::Char('r') => apply_radio(app.radio.toggle(), players),
        KeyCode::Char('R') => {
            apply_radio(app.radio.select_next(&settings.radio.stations), players)
        }
        _ => {}
    }

    Ok(false)
}
