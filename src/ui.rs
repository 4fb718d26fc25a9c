//! UI rendering for the terminal overlay.
//!
//! Everything here reads the store and the `App` view model; nothing in this
//! module dispatches intents.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, Focus};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::store::PlayerStore;

const REEL_FRAMES: [char; 4] = ['◐', '◓', '◑', '◒'];
const ACCENT: Color = Color::Rgb(0xe0, 0x7a, 0x5f);

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    [
        "[j/k] up/down".to_string(),
        "[tab] shelf/tracks".to_string(),
        "[enter] load/play".to_string(),
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] seek -/+{}s", controls.scrub_seconds),
        "[0] rewind".to_string(),
        format!("[-/+] volume {:.0}%", controls.volume_step * 100.0),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format seconds as `MM:SS`; anything unusable renders as `--:--`.
fn format_mmss(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "--:--".to_string();
    }
    let secs = Duration::from_secs_f64(seconds).as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the elapsed/total/remaining text for the now-playing card.
fn time_text(current: f64, duration: f64, ui: &UiSettings) -> String {
    let known = duration > 0.0 && duration.is_finite();
    ui.now_playing_time_fields
        .iter()
        .filter_map(|f| match f {
            TimeField::Elapsed => Some(format_mmss(current)),
            TimeField::Total => known.then(|| format_mmss(duration)),
            TimeField::Remaining => {
                known.then(|| format!("-{}", format_mmss((duration - current).max(0.0))))
            }
        })
        .collect::<Vec<_>>()
        .join(&ui.now_playing_time_separator)
}

/// Parse a `#rrggbb` accent colour.
fn parse_hex(color: &str) -> Option<Color> {
    let hex = color.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn reels_line(app: &App, store: &PlayerStore, ui: &UiSettings) -> String {
    let reel = if ui.show_reels {
        REEL_FRAMES[app.reel_frame % REEL_FRAMES.len()]
    } else {
        '◉'
    };
    // Tape moves from the left reel to the right one as the track plays.
    let width = 16usize;
    let wound = (store.progress_ratio() * width as f64).round() as usize;
    let tape: String = (0..width)
        .map(|i| if i < wound { '=' } else { '-' })
        .collect();
    format!("({reel}) {tape} ({reel})")
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().fg(ACCENT))
    } else {
        block
    }
}

fn draw_shelf(frame: &mut Frame, area: Rect, app: &App, store: &PlayerStore) {
    let loaded_id = store.current_mixtape().map(|m| m.id.as_str());
    let items: Vec<ListItem> = app
        .mixtapes
        .iter()
        .map(|m| {
            let marker = if Some(m.id.as_str()) == loaded_id {
                "● "
            } else {
                "  "
            };
            let tint = parse_hex(&m.color).unwrap_or(ACCENT);
            ListItem::new(Line::from(vec![
                Span::styled("▮ ", Style::default().fg(tint)),
                Span::raw(marker),
                Span::raw(m.title.as_str()),
                Span::styled(
                    format!("  ({})", m.tracks.len()),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(" shelf ", app.focus == Focus::Shelf))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if app.has_mixtapes() {
        state.select(Some(app.shelf_selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_tracklist(frame: &mut Frame, area: Rect, app: &App, store: &PlayerStore) {
    let focused = app.focus == Focus::Tracklist;
    let Some(mixtape) = store.current_mixtape() else {
        let empty = Paragraph::new("No mixtape in the deck.")
            .alignment(Alignment::Center)
            .block(pane_block(" tracks ", focused));
        frame.render_widget(empty, area);
        return;
    };

    let current_id = store.current_track().map(|t| t.id.as_str());
    let items: Vec<ListItem> = mixtape
        .tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let style = if Some(t.id.as_str()) == current_id {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(format!("{:>2}. {}", i + 1, t.display), style))
        })
        .collect();

    let title = format!(" {} ", mixtape.title);
    let list = List::new(items)
        .block(pane_block(&title, focused))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !mixtape.is_empty() {
        state.select(Some(app.track_selected.min(mixtape.tracks.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing(frame: &mut Frame, area: Rect, app: &App, store: &PlayerStore, ui: &UiSettings) {
    let block = Block::bordered()
        .title(" now playing ")
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let Some(track) = store.current_track() else {
        frame.render_widget(Paragraph::new("Insert a mixtape from the shelf."), rows[0]);
        return;
    };

    let tape_title = store
        .current_mixtape()
        .map(|m| m.title.to_uppercase())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Span::styled(
            tape_title,
            Style::default().add_modifier(Modifier::DIM),
        )),
        rows[0],
    );

    let who = match track.artist.as_deref() {
        Some(artist) => format!("{} - {}", track.title, artist),
        None => track.title.clone(),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(who, Style::default().add_modifier(Modifier::BOLD))),
        rows[1],
    );

    let state = if store.is_playing() { "PLAY" } else { "PAUSE" };
    let volume = (store.volume().clamp(0.0, 1.0) * 100.0).round();
    frame.render_widget(
        Paragraph::new(format!(
            "{}   {}   VOL {:>3}%",
            reels_line(app, store, ui),
            state,
            volume
        )),
        rows[2],
    );

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(ACCENT))
        .ratio(store.progress_ratio())
        .label(time_text(store.current_time(), store.duration(), ui));
    frame.render_widget(gauge, rows[3]);
}

/// Render the entire overlay into `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    store: &PlayerStore,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header_title = match &app.origin {
        Some(origin) => format!(" tapedeck • {origin} "),
        None => " tapedeck ".to_string(),
    };
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(ACCENT))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(header_title)
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    draw_shelf(frame, panes[0], app, store);
    draw_tracklist(frame, panes[1], app, store);

    draw_now_playing(frame, chunks[2], app, store, ui_settings);

    let footer = Paragraph::new(controls_text(controls_settings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding::left(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
