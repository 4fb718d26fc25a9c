use std::env;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::{AudioBinding, AudioResource, NullResource, RodioResource};
use crate::config;
use crate::store::PlayerStore;

mod event_loop;
mod logging;
mod settings;
mod startup;

/// Open the default output device, or fall back to a resource that stays
/// silent and rejects every play.
fn open_audio(settings: &config::AudioSettings) -> Box<dyn AudioResource> {
    match RodioResource::open(Duration::from_millis(settings.tick_ms)) {
        Ok(resource) => Box::new(resource),
        Err(e) => {
            warn!(error = %e, "no audio output, playback disabled");
            Box::new(NullResource::new(e.to_string()))
        }
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = settings::load_settings();
    if let Some(path) = logging::init(&settings.logging, settings.log_file()) {
        info!(log = %path.display(), "tapedeck starting");
    }
    if let Some(problem) = settings_problem {
        warn!("{problem}");
    }

    let source = startup::ShelfSource::resolve(env::args().nth(1), &settings.catalog);
    let mixtapes = startup::load_shelf(&source, &settings.catalog);

    let mut app = App::new(mixtapes);
    app.set_origin(source.path().display().to_string());

    let mut store = PlayerStore::with_volume(settings.audio.initial_volume);
    startup::apply_startup_defaults(&mut app, &mut store, &settings);

    let mut binding = AudioBinding::mount(open_audio(&settings.audio), &mut store);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut app, &mut store, &mut binding);

    // Silence the deck before handing the terminal back.
    binding.unmount();
    info!("shutting down");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
