//! Audio subsystem: the resource capability, the binding that keeps a
//! resource in step with the playback store, and the rodio-backed resource.

mod binding;
mod resource;
mod sink;
mod types;

pub use binding::AudioBinding;
pub use resource::{AudioResource, NullResource};
pub use sink::RodioResource;
pub use types::*;
