//! Mixtape catalog: the immutable `Track` / `Mixtape` values the player
//! consumes, and the two ways of producing them (a TOML catalog file or a
//! scan of a music directory).

mod display;
mod load;
mod model;
mod scan;

pub use display::track_label;
pub use load::{CatalogError, load_catalog, parse_catalog};
pub use model::{Mixtape, Track};
pub use scan::scan_mixtapes;
