use std::env;
use std::io;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, ViewSettings};
use crate::audio::AudioPlayer;
use crate::radio::RadioPlayer;

mod event_loop;
mod logging;
mod settings;
mod startup;

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Put the terminal back before the default hook prints the panic.
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        hook(panic_info);
    }));
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();

    let mut catalog_arg: Option<String> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--print-config" => {
                print!("{}", toml::to_string_pretty(&settings)?);
                return Ok(());
            }
            _ if catalog_arg.is_none() => catalog_arg = Some(arg),
            _ => {}
        }
    }

    let data_dir = settings.data_dir();
    match logging::init(&data_dir) {
        Ok(path) => info!(log = %path.display(), "jukebox starting"),
        // Logging is optional; the player runs without it.
        Err(e) => eprintln!("jukebox: logging disabled: {e}"),
    }
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let source = startup::catalog_source(catalog_arg, &settings);
    let catalog_rx = startup::spawn_catalog_load(source);

    let audio_player = AudioPlayer::new(settings.audio.clone());
    let radio_player = RadioPlayer::new();

    let mut app = App::new(
        ViewSettings::from_settings(&settings),
        startup::open_favorites(&settings),
    );
    app.volume = settings.audio.initial_volume.min(100);
    app.set_playback_handle(audio_player.playback_handle());

    set_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(catalog_rx, settings.ui.animations);
        let players = event_loop::Players {
            audio: &audio_player,
            radio: &radio_player,
        };
        event_loop::run(&mut terminal, &settings, &mut app, &players, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("jukebox exiting");
    run_result
}
