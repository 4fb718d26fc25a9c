use std::path::Path;

use crate::config::TrackDisplayField;

/// Compose the label shown for a track from the configured `fields`.
///
/// Empty or missing fields are skipped; when nothing is left the bare
/// `title` is used.
pub fn track_label(
    title: &str,
    artist: Option<&str>,
    source: &str,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let parts: Vec<&str> = fields
        .iter()
        .filter_map(|f| match f {
            TrackDisplayField::Title => Some(title),
            TrackDisplayField::Artist => artist,
            TrackDisplayField::Filename => Path::new(source).file_stem().and_then(|s| s.to_str()),
        })
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
