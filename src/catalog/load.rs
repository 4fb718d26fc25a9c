use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::CatalogSettings;

use super::display::track_label;
use super::model::{Mixtape, Track};

const DEFAULT_COLOR: &str = "#e07a5f";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate mixtape id {0:?}")]
    DuplicateMixtape(String),
    #[error("duplicate track id {track:?} on mixtape {mixtape:?}")]
    DuplicateTrack { mixtape: String, track: String },
}

/// On-disk catalog layout:
///
/// ```toml
/// [[mixtape]]
/// id = "1"
/// title = "Awesome Mix Vol. 1"
/// color = "#e07a5f"
///
/// [[mixtape.track]]
/// id = "t1"
/// title = "Hooked on a Feeling"
/// artist = "Blue Swede"
/// duration = 172
/// source = "hooked_on_a_feeling.mp3"
/// ```
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "mixtape")]
    mixtapes: Vec<MixtapeEntry>,
}

#[derive(Debug, Deserialize)]
struct MixtapeEntry {
    id: String,
    title: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default, rename = "track")]
    tracks: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    id: String,
    title: String,
    #[serde(default)]
    artist: Option<String>,
    /// Seconds.
    #[serde(default)]
    duration: Option<f64>,
    source: String,
}

/// Read and validate the catalog file at `path`. Relative track sources are
/// resolved against the file's directory.
pub fn load_catalog(path: &Path, settings: &CatalogSettings) -> Result<Vec<Mixtape>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&text, path.parent(), settings)
}

/// Parse catalog TOML. `base_dir`, when given, anchors relative sources.
pub fn parse_catalog(
    text: &str,
    base_dir: Option<&Path>,
    settings: &CatalogSettings,
) -> Result<Vec<Mixtape>, CatalogError> {
    let file: CatalogFile = toml::from_str(text)?;

    let mut seen_mixtapes = HashSet::new();
    let mut mixtapes = Vec::with_capacity(file.mixtapes.len());

    for entry in file.mixtapes {
        if !seen_mixtapes.insert(entry.id.clone()) {
            return Err(CatalogError::DuplicateMixtape(entry.id));
        }

        let mut seen_tracks = HashSet::new();
        let mut tracks = Vec::with_capacity(entry.tracks.len());
        for t in entry.tracks {
            if !seen_tracks.insert(t.id.clone()) {
                return Err(CatalogError::DuplicateTrack {
                    mixtape: entry.id,
                    track: t.id,
                });
            }

            let source = resolve_source(&t.source, base_dir);
            let artist = t
                .artist
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty());
            let duration_hint = t
                .duration
                .and_then(|d| Duration::try_from_secs_f64(d).ok());
            let display = track_label(
                &t.title,
                artist.as_deref(),
                &source,
                &settings.display_fields,
                &settings.display_separator,
            );

            tracks.push(Track {
                id: t.id,
                title: t.title,
                artist,
                duration_hint,
                source,
                display,
            });
        }

        debug!(mixtape = %entry.id, tracks = tracks.len(), "catalog mixtape parsed");
        mixtapes.push(Mixtape {
            id: entry.id,
            title: entry.title,
            color: entry.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            tracks,
        });
    }

    Ok(mixtapes)
}

fn resolve_source(source: &str, base_dir: Option<&Path>) -> String {
    if source.contains("://") {
        return source.to_string();
    }
    match base_dir {
        Some(base) if Path::new(source).is_relative() => base.join(source).display().to_string(),
        _ => source.to_string(),
    }
}
