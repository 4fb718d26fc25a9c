use std::path::Path;

use lofty::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::CatalogSettings;

use super::display::track_label;
use super::model::{Mixtape, Track};

/// Shelf colours handed out to scanned mixtapes in order.
const PALETTE: [&str; 6] = [
    "#e07a5f", "#3d5a80", "#81b29a", "#f2cc8f", "#98c1d9", "#9c6644",
];

fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .any(|e| !e.is_empty() && e == ext)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn dir_title(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Build a shelf from a music directory.
///
/// Every immediate subdirectory holding audio becomes one mixtape; audio files
/// sitting directly in `root` form one more mixtape named after `root`.
/// Mixtapes are ordered by directory name, tracks by their display label.
pub fn scan_mixtapes(root: &Path, settings: &CatalogSettings) -> Vec<Mixtape> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(root = %root.display(), error = %e, "cannot read music directory");
            return Vec::new();
        }
    };

    let mut dirs: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter(|p| settings.include_hidden || !is_hidden(p))
        .collect();
    dirs.sort();

    // Non-recursive = only files directly inside each mixtape directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };

    let mut mixtapes = Vec::new();
    for dir in dirs {
        let tracks = scan_tracks(&dir, settings, depth_cap);
        if tracks.is_empty() {
            continue;
        }
        mixtapes.push(Mixtape {
            id: dir.display().to_string(),
            title: dir_title(&dir),
            color: String::new(),
            tracks,
        });
    }

    let loose = scan_tracks(root, settings, Some(1));
    if !loose.is_empty() {
        mixtapes.push(Mixtape {
            id: root.display().to_string(),
            title: dir_title(root),
            color: String::new(),
            tracks: loose,
        });
    }

    for (i, m) in mixtapes.iter_mut().enumerate() {
        m.color = PALETTE[i % PALETTE.len()].to_string();
    }

    debug!(root = %root.display(), mixtapes = mixtapes.len(), "music directory scanned");
    mixtapes
}

fn scan_tracks(dir: &Path, settings: &CatalogSettings, max_depth: Option<usize>) -> Vec<Track> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if let Some(d) = max_depth {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && is_audio_file(e.path(), settings))
        .map(|e| read_track(dir, e.path(), settings))
        .collect();

    tracks.sort_by(|a, b| a.display.to_lowercase().cmp(&b.display.to_lowercase()));
    tracks
}

fn read_track(dir: &Path, path: &Path, settings: &CatalogSettings) -> Track {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist: Option<String> = None;
    let mut duration_hint = None;

    // Unreadable tags are fine; the filename stands in for the title.
    if let Ok(tagged) = lofty::read_from_path(path) {
        duration_hint = Some(tagged.properties().duration());

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.title().map(|v| v.trim().to_string()) {
                if !v.is_empty() {
                    title = v;
                }
            }
            artist = tag
                .artist()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
    }

    let source = path.display().to_string();
    let id = path
        .strip_prefix(dir)
        .unwrap_or(path)
        .display()
        .to_string();
    let display = track_label(
        &title,
        artist.as_deref(),
        &source,
        &settings.display_fields,
        &settings.display_separator,
    );

    Track {
        id,
        title,
        artist,
        duration_hint,
        source,
        display,
    }
}
