use std::time::Duration;

/// A single song on a mixtape. Never mutated after the catalog is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique within the owning mixtape.
    pub id: String,
    pub title: String,
    pub artist: Option<String>,
    /// Advisory only; the decoded source reports the authoritative length.
    pub duration_hint: Option<Duration>,
    /// Opaque locator handed to the audio resource (a path or `file://` URI).
    pub source: String,
    pub display: String,
}

/// An ordered collection of tracks. Track order defines next/prev traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct Mixtape {
    pub id: String,
    pub title: String,
    /// Accent colour (`#rrggbb`), presentation only.
    pub color: String,
    pub tracks: Vec<Track>,
}

impl Mixtape {
    /// Index of the track with `track_id`, if it is on this mixtape.
    pub fn position_of(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
