//! Store types: `PlayerState`, `Changes` and the `PlayerStore` transitions.

use std::mem;

use tracing::debug;

use crate::catalog::{Mixtape, Track};

/// Volume used when no configuration overrides it.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Declared playback intent plus the mirror of the resource's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// What the user asked for, not what the speakers are doing.
    pub is_playing: bool,
    pub current_mixtape: Option<Mixtape>,
    /// Normally an element of `current_mixtape.tracks`; `play_track` does not
    /// enforce it.
    pub current_track: Option<Track>,
    /// Stored as given; the audio binding clamps before applying it.
    pub volume: f32,
    /// Seconds, as last reported by the audio resource.
    pub current_time: f64,
    /// Seconds; `0` until the resource reports metadata.
    pub duration: f64,
    /// One-shot seek request, consumed by the audio binding.
    pub pending_seek: Option<f64>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_mixtape: None,
            current_track: None,
            volume: DEFAULT_VOLUME,
            current_time: 0.0,
            duration: 0.0,
            pending_seek: None,
        }
    }
}

/// Fields that changed since the observer last took the change set.
///
/// Changes coalesce: any number of transitions between two reconciliations
/// leave at most one flag per field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub track: bool,
    pub playing: bool,
    pub volume: bool,
    pub seek: bool,
}

impl Changes {
    pub fn any(&self) -> bool {
        self.track || self.playing || self.volume || self.seek
    }

    /// Every flag set; used when an observer first attaches.
    pub fn all() -> Self {
        Self {
            track: true,
            playing: true,
            volume: true,
            seek: true,
        }
    }
}

/// Holds the `PlayerState` and applies transitions to it.
///
/// Every operation is a synchronous `&mut self` call, so no partially
/// applied transition is ever observable.
#[derive(Debug, Default)]
pub struct PlayerStore {
    state: PlayerState,
    changes: Changes,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose initial volume is `volume`.
    pub fn with_volume(volume: f32) -> Self {
        Self {
            state: PlayerState {
                volume,
                ..PlayerState::default()
            },
            changes: Changes::default(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn current_mixtape(&self) -> Option<&Mixtape> {
        self.state.current_mixtape.as_ref()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.current_track.as_ref()
    }

    pub fn volume(&self) -> f32 {
        self.state.volume
    }

    pub fn current_time(&self) -> f64 {
        self.state.current_time
    }

    pub fn duration(&self) -> f64 {
        self.state.duration
    }

    pub fn pending_seek(&self) -> Option<f64> {
        self.state.pending_seek
    }

    /// Elapsed fraction in `[0, 1]`; `0` while the duration is unknown.
    pub fn progress_ratio(&self) -> f64 {
        let PlayerState {
            current_time,
            duration,
            ..
        } = self.state;
        if duration > 0.0 && duration.is_finite() && current_time.is_finite() {
            (current_time / duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Hand the accumulated change set to the caller and start a fresh one.
    pub fn take_changes(&mut self) -> Changes {
        mem::take(&mut self.changes)
    }

    #[cfg(test)]
    pub fn has_changes(&self) -> bool {
        self.changes.any()
    }

    /// Put `mixtape` in the deck, cued at its first track and paused.
    /// An empty mixtape leaves no current track.
    pub fn load_mixtape(&mut self, mixtape: Mixtape) {
        debug!(mixtape = %mixtape.id, tracks = mixtape.tracks.len(), "load mixtape");
        let first = mixtape.tracks.first().cloned();
        self.state.current_mixtape = Some(mixtape);
        self.replace_track(first);
        self.set_playing(false);
        self.reset_progress();
    }

    /// Start `track`. Membership in the current mixtape is the caller's
    /// responsibility and is not checked.
    pub fn play_track(&mut self, track: Track) {
        debug!(track = %track.id, "play track");
        self.replace_track(Some(track));
        self.set_playing(true);
        self.reset_progress();
    }

    pub fn play(&mut self) {
        self.set_playing(true);
    }

    pub fn pause(&mut self) {
        self.set_playing(false);
    }

    pub fn toggle_play(&mut self) {
        self.set_playing(!self.state.is_playing);
    }

    pub fn set_volume(&mut self, volume: f32) {
        if self.state.volume != volume {
            self.state.volume = volume;
            self.changes.volume = true;
        }
    }

    /// Mirror the resource's reported position and length.
    pub fn set_progress(&mut self, current_time: f64, duration: f64) {
        self.state.current_time = current_time;
        self.state.duration = duration;
    }

    /// Ask the audio binding to move to `seconds`. `current_time` only moves
    /// once the resource reports the new position.
    pub fn seek_to(&mut self, seconds: f64) {
        self.state.pending_seek = Some(seconds);
        self.changes.seek = true;
    }

    pub fn clear_seek_request(&mut self) {
        self.state.pending_seek = None;
    }

    /// Advance to the following track, wrapping to the first.
    pub fn next_track(&mut self) {
        self.step_track(1);
    }

    /// Go back to the preceding track, wrapping to the last.
    pub fn prev_track(&mut self) {
        self.step_track(-1);
    }

    fn step_track(&mut self, step: isize) {
        let (Some(mixtape), Some(track)) = (&self.state.current_mixtape, &self.state.current_track)
        else {
            return;
        };
        let len = mixtape.tracks.len() as isize;
        if len == 0 {
            return;
        }

        // A track that is not on the mixtape counts as sitting just before
        // the first one.
        let current = mixtape.position_of(&track.id).map_or(-1, |i| i as isize);
        let target = (current + step).rem_euclid(len) as usize;
        let next = mixtape.tracks[target].clone();

        self.replace_track(Some(next));
        self.reset_progress();
    }

    fn replace_track(&mut self, track: Option<Track>) {
        if self.state.current_track != track {
            self.state.current_track = track;
            self.changes.track = true;
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.state.is_playing != playing {
            self.state.is_playing = playing;
            self.changes.playing = true;
        }
    }

    fn reset_progress(&mut self) {
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
    }
}
