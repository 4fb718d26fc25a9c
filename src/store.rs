//! Playback store: the single source of truth for what should be playing.
//!
//! `PlayerStore` owns the `PlayerState` and exposes the synchronous
//! transitions the overlay and the audio binding use. It performs no I/O.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
