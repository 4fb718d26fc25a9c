use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::audio::{AudioBinding, AudioResource};
use crate::config;
use crate::store::PlayerStore;
use crate::ui;

/// Main terminal event loop: drains audio events into the store, draws, and
/// turns key presses into store intents. Returns `Ok(())` when the user
/// quits.
pub fn run<R: AudioResource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    store: &mut PlayerStore,
    binding: &mut AudioBinding<R>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        binding.pump(store);
        app.follow(store);
        app.advance_reels(store);

        terminal.draw(|f| ui::draw(f, app, store, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, store) {
                    break;
                }
                binding.reconcile(store);
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    store: &mut PlayerStore,
) -> bool {
    let controls = &settings.controls;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(store),
        KeyCode::Char('k') | KeyCode::Up => app.prev(store),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Enter => app.activate(store),
        KeyCode::Char('p') | KeyCode::Char(' ') => store.toggle_play(),
        KeyCode::Char('l') => {
            app.follow_playback = true;
            store.next_track();
        }
        KeyCode::Char('h') => {
            app.follow_playback = true;
            store.prev_track();
        }
        KeyCode::Char('L') => {
            if let Some(target) = App::seek_target(store, controls.scrub_seconds as f64) {
                store.seek_to(target);
            }
        }
        KeyCode::Char('H') => {
            if let Some(target) = App::seek_target(store, -(controls.scrub_seconds as f64)) {
                store.seek_to(target);
            }
        }
        KeyCode::Char('0') => {
            if store.current_track().is_some() {
                store.seek_to(0.0);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            store.set_volume(App::volume_target(store, controls.volume_step));
        }
        KeyCode::Char('-') => {
            store.set_volume(App::volume_target(store, -controls.volume_step));
        }
        other => debug!(key = ?other, "unbound key"),
    }
    false
}
