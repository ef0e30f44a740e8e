//! Recently played tracks and the recommendations derived from them.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{Catalog, TrackId};

/// Tracks whose playback started this session, oldest first, without repeats.
#[derive(Debug, Clone, Default)]
pub struct History {
    played: Vec<TrackId>,
}

impl History {
    /// Append `id` unless it is already present. Returns true when appended.
    pub fn record(&mut self, id: &TrackId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.played.push(id.clone());
        true
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.played.contains(id)
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.played
    }
}

/// Up to `limit` random unplayed tracks sharing the genre of the track at `seed`.
///
/// Genres compare after trimming. A seed without a genre draws from every
/// unplayed track.
pub fn recommend<R: Rng + ?Sized>(
    catalog: &Catalog,
    seed: usize,
    history: &History,
    limit: usize,
    rng: &mut R,
) -> Vec<usize> {
    let Some(seed_track) = catalog.get(seed) else {
        return Vec::new();
    };
    let genre = seed_track.genre.trim();

    let mut candidates: Vec<usize> = catalog
        .tracks()
        .iter()
        .enumerate()
        .filter(|(i, t)| {
            *i != seed
                && !history.contains(&t.id)
                && (genre.is_empty() || t.genre.trim() == genre)
        })
        .map(|(i, _)| i)
        .collect();

    candidates.shuffle(rng);
    candidates.truncate(limit);
    candidates
}
