use std::collections::HashSet;

use super::model::Track;

/// Distinct selector values offered next to the implicit "any" entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub countries: Vec<String>,
    pub genres: Vec<String>,
}

impl FilterOptions {
    /// Derive countries and genres from the full catalog, each in first-seen order.
    /// Blank values are not offered.
    pub fn from_tracks(tracks: &[Track]) -> Self {
        Self {
            countries: distinct_in_order(tracks.iter().map(|t| t.country.as_str())),
            genres: distinct_in_order(tracks.iter().map(|t| t.genre.as_str())),
        }
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if v.trim().is_empty() {
            continue;
        }
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    out
}
