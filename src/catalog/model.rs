use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a track within one loaded catalog.
///
/// Source documents may use numbers or strings; both end up as the same textual key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub String);

impl TrackId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub country: String,
    pub genre: String,
    /// Media locator: a local path or an `http(s)` URL.
    pub url: String,
}

pub(crate) fn is_remote_locator(locator: &str) -> bool {
    let lower = locator.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Lowercased search fields, computed once per track at load.
#[derive(Debug, Clone)]
struct SearchKey {
    title: String,
    artist: String,
}

/// The full, read-only list of tracks produced by one load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    keys: Vec<SearchKey>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        let keys = tracks
            .iter()
            .map(|t| SearchKey {
                title: t.title.to_lowercase(),
                artist: t.artist.to_lowercase(),
            })
            .collect();
        Self { tracks, keys }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Index of the track with `id`, if present.
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Lowercased `(title, artist)` for the track at `index`.
    pub(super) fn search_key(&self, index: usize) -> (&str, &str) {
        let key = &self.keys[index];
        (&key.title, &key.artist)
    }
}
