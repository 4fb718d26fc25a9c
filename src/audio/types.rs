//! Audio-related small types: resource state, events and errors.

use std::sync::mpsc::Sender;

use thiserror::Error;

/// Where the audio resource is in its lifecycle, as seen by the binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ResourceState {
    /// No source assigned.
    #[default]
    Idle,
    /// Source assigned, duration not known yet.
    Loading,
    /// Duration known.
    Ready,
    /// Playback ran to the end of the source.
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("no audio output: {0}")]
    Output(String),
    #[error("no source assigned")]
    NoSource,
    #[error("unsupported locator {0:?}")]
    UnsupportedLocator(String),
    #[error("failed to open {path}: {reason}")]
    Open { path: String, reason: String },
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Notifications an audio resource emits to its observer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    /// The source's length (seconds) is known. May be non-finite for
    /// sources whose length cannot be determined.
    MetadataLoaded { duration: f64 },
    /// Periodic progress while playing; the position is read from the
    /// resource when the event is handled.
    TimeUpdate,
    /// Playback reached the end of the source.
    Ended,
    /// The source could not be loaded or decoded.
    Error(ResourceError),
    /// A play command was refused.
    PlayRejected(ResourceError),
}

pub type EventSender = Sender<ResourceEvent>;
