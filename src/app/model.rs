//! Overlay model types: `App` and `Focus`.

use crate::catalog::{Mixtape, Track};
use crate::store::PlayerStore;

/// Which pane the cursor keys move in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Shelf,
    Tracklist,
}

/// What `Enter` asks the store to do, given the cursor.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Mixtape(Mixtape),
    Track(Track),
}

pub struct App {
    /// Everything on the shelf, in catalog order.
    pub mixtapes: Vec<Mixtape>,
    pub shelf_selected: usize,
    /// Cursor within the tracklist of the mixtape in the deck.
    pub track_selected: usize,
    pub focus: Focus,
    /// Keep the tracklist cursor on the current track.
    pub follow_playback: bool,
    /// Animation frame for the tape reels.
    pub reel_frame: usize,
    /// Where the shelf came from (catalog file or music directory).
    pub origin: Option<String>,
}

impl App {
    /// Create a new `App` around the given shelf.
    pub fn new(mixtapes: Vec<Mixtape>) -> Self {
        Self {
            mixtapes,
            shelf_selected: 0,
            track_selected: 0,
            focus: Focus::Shelf,
            follow_playback: true,
            reel_frame: 0,
            origin: None,
        }
    }

    pub fn set_origin(&mut self, origin: String) {
        self.origin = Some(origin);
    }

    pub fn has_mixtapes(&self) -> bool {
        !self.mixtapes.is_empty()
    }

    pub fn selected_mixtape(&self) -> Option<&Mixtape> {
        self.mixtapes.get(self.shelf_selected)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Shelf => Focus::Tracklist,
            Focus::Tracklist => Focus::Shelf,
        };
    }

    /// Move the cursor of the focused pane down, wrapping to the top.
    pub fn next(&mut self, store: &PlayerStore) {
        match self.focus {
            Focus::Shelf => {
                self.shelf_selected = wrap_step(self.shelf_selected, self.mixtapes.len(), 1)
            }
            Focus::Tracklist => {
                self.follow_playback = false;
                self.track_selected = wrap_step(self.track_selected, deck_len(store), 1);
            }
        }
    }

    /// Move the cursor of the focused pane up, wrapping to the bottom.
    pub fn prev(&mut self, store: &PlayerStore) {
        match self.focus {
            Focus::Shelf => {
                self.shelf_selected = wrap_step(self.shelf_selected, self.mixtapes.len(), -1)
            }
            Focus::Tracklist => {
                self.follow_playback = false;
                self.track_selected = wrap_step(self.track_selected, deck_len(store), -1);
            }
        }
    }

    /// Resolve what the cursor points at in the focused pane.
    pub fn selection(&self, store: &PlayerStore) -> Option<Selection> {
        match self.focus {
            Focus::Shelf => self.selected_mixtape().cloned().map(Selection::Mixtape),
            Focus::Tracklist => store
                .current_mixtape()
                .and_then(|m| m.tracks.get(self.track_selected))
                .cloned()
                .map(Selection::Track),
        }
    }

    /// Hand the cursor's selection to the store: a mixtape goes in the
    /// deck, a track starts playing.
    pub fn activate(&mut self, store: &mut PlayerStore) {
        match self.selection(store) {
            Some(Selection::Mixtape(m)) => {
                store.load_mixtape(m);
                self.track_selected = 0;
                self.follow_playback = true;
                self.focus = Focus::Tracklist;
            }
            Some(Selection::Track(t)) => {
                store.play_track(t);
                self.follow_playback = true;
            }
            None => {}
        }
    }

    /// Bring the tracklist cursor (and shelf cursor) to what is in the deck
    /// when following playback.
    pub fn follow(&mut self, store: &PlayerStore) {
        if !self.follow_playback {
            return;
        }
        let Some(mixtape) = store.current_mixtape() else {
            return;
        };
        if let Some(track) = store.current_track() {
            if let Some(pos) = mixtape.position_of(&track.id) {
                self.track_selected = pos;
            }
        }
        if self.focus == Focus::Tracklist {
            if let Some(pos) = self.mixtapes.iter().position(|m| m.id == mixtape.id) {
                self.shelf_selected = pos;
            }
        }
    }

    /// Spin the reels one frame while the store says we are playing.
    pub fn advance_reels(&mut self, store: &PlayerStore) {
        if store.is_playing() {
            self.reel_frame = self.reel_frame.wrapping_add(1);
        }
    }

    /// Target for a relative seek of `delta` seconds, kept inside the known
    /// length of the track. `None` when nothing is in the deck.
    pub fn seek_target(store: &PlayerStore, delta: f64) -> Option<f64> {
        store.current_track()?;
        let mut target = (store.current_time() + delta).max(0.0);
        let duration = store.duration();
        if duration > 0.0 && duration.is_finite() {
            target = target.min(duration);
        }
        Some(target)
    }

    /// Volume after a `delta` step, clamped to `[0, 1]`.
    pub fn volume_target(store: &PlayerStore, delta: f32) -> f32 {
        let current = store.volume();
        let current = if current.is_nan() { 0.0 } else { current };
        (current + delta).clamp(0.0, 1.0)
    }
}

fn deck_len(store: &PlayerStore) -> usize {
    store.current_mixtape().map_or(0, |m| m.tracks.len())
}

fn wrap_step(current: usize, len: usize, step: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + step).rem_euclid(len as isize) as usize
}
