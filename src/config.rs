//! Configuration loader and schema types.
//!
//! This module exposes the settings schema that drives the player and the
//! helpers that locate and layer configuration sources.

mod load;
mod schema;

pub use load::default_state_dir;
pub use schema::*;

#[cfg(test)]
mod tests;
