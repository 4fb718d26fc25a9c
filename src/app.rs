//! Application module: the overlay's view model.
//!
//! `App` lives in `app::model` and holds the mixtape shelf, the cursors and
//! the bits of presentation state the UI animates. Playback state itself
//! lives in the store.

mod model;

pub use model::*;
