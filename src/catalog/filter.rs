//! Catalog filtering by free text, country and genre.

use super::model::{Catalog, Track};

/// A selector value: either no constraint, or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    #[default]
    Any,
    Only(String),
}

impl Choice {
    /// Exact, case-sensitive comparison; `Any` accepts everything.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Choice::Any => true,
            Choice::Only(v) => v == value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Choice::Any => "any",
            Choice::Only(v) => v,
        }
    }

    /// Step forward through `Any, options[0], .., options[n-1]` and wrap to `Any`.
    pub fn cycle_next(&self, options: &[String]) -> Choice {
        let next = match self.position_in(options) {
            None => 0,
            Some(p) => p + 1,
        };
        match options.get(next) {
            Some(v) => Choice::Only(v.clone()),
            None => Choice::Any,
        }
    }

    /// Step backward through the same cycle as [`Choice::cycle_next`].
    pub fn cycle_prev(&self, options: &[String]) -> Choice {
        match self.position_in(options) {
            None => options
                .last()
                .map(|v| Choice::Only(v.clone()))
                .unwrap_or(Choice::Any),
            Some(0) => Choice::Any,
            Some(p) => Choice::Only(options[p - 1].clone()),
        }
    }

    // `Any` and values no longer offered both map to `None`.
    fn position_in(&self, options: &[String]) -> Option<usize> {
        match self {
            Choice::Any => None,
            Choice::Only(v) => options.iter().position(|o| o == v),
        }
    }
}

/// The active `(query, country, genre)` tuple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub country: Choice,
    pub genre: Choice,
}

impl FilterCriteria {
    /// True when no criterion excludes anything.
    pub fn is_unfiltered(&self) -> bool {
        self.query.is_empty() && self.country == Choice::Any && self.genre == Choice::Any
    }

    // `query_lower` and the search fields are already lowercased.
    fn admits(&self, track: &Track, search: (&str, &str), query_lower: &str) -> bool {
        let (title, artist) = search;
        self.country.accepts(&track.country)
            && self.genre.accepts(&track.genre)
            && (query_lower.is_empty() || title.contains(query_lower) || artist.contains(query_lower))
    }
}

/// Catalog indices of the tracks matching `criteria`, in catalog order.
pub fn filter_indices(catalog: &Catalog, criteria: &FilterCriteria) -> Vec<usize> {
    let query = criteria.query.to_lowercase();
    catalog
        .tracks()
        .iter()
        .enumerate()
        .filter(|(i, t)| criteria.admits(t, catalog.search_key(*i), &query))
        .map(|(i, _)| i)
        .collect()
}
