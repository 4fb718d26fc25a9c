use std::env;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::app::App;
use crate::catalog::{self, Mixtape};
use crate::config;
use crate::store::PlayerStore;

/// Where the shelf is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShelfSource {
    Catalog(PathBuf),
    Directory(PathBuf),
}

impl ShelfSource {
    /// Pick the shelf source: the command-line argument first (a `.toml`
    /// file is a catalog, anything else a music directory), then
    /// `catalog.path`, then `catalog.music_dir`, then the working directory.
    pub fn resolve(arg: Option<String>, settings: &config::CatalogSettings) -> Self {
        if let Some(arg) = arg {
            let path = PathBuf::from(arg);
            let is_catalog = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
            return if is_catalog {
                ShelfSource::Catalog(path)
            } else {
                ShelfSource::Directory(path)
            };
        }
        if let Some(path) = &settings.path {
            return ShelfSource::Catalog(path.clone());
        }
        if let Some(dir) = &settings.music_dir {
            return ShelfSource::Directory(dir.clone());
        }
        ShelfSource::Directory(env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    pub fn path(&self) -> &Path {
        match self {
            ShelfSource::Catalog(p) | ShelfSource::Directory(p) => p,
        }
    }
}

/// Build the shelf. An unreadable catalog yields an empty shelf.
pub fn load_shelf(source: &ShelfSource, settings: &config::CatalogSettings) -> Vec<Mixtape> {
    let mixtapes = match source {
        ShelfSource::Catalog(path) => match catalog::load_catalog(path, settings) {
            Ok(mixtapes) => mixtapes,
            Err(e) => {
                warn!(catalog = %path.display(), error = %e, "catalog unusable, shelf is empty");
                Vec::new()
            }
        },
        ShelfSource::Directory(dir) => catalog::scan_mixtapes(dir, settings),
    };
    info!(source = %source.path().display(), mixtapes = mixtapes.len(), "shelf loaded");
    mixtapes
}

/// Put the first mixtape in the deck when `catalog.autoload_first` asks for it.
pub fn apply_startup_defaults(app: &mut App, store: &mut PlayerStore, settings: &config::Settings) {
    if settings.catalog.autoload_first && app.has_mixtapes() {
        app.shelf_selected = 0;
        app.activate(store);
    }
}
