//! Persistent favorites.
//!
//! Favorites are a list of track ids stored as a JSON array in the data
//! directory. The file is read once at startup and rewritten on each change.
//! A missing or unreadable file yields an empty list; the player never fails
//! to start because of it.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::TrackId;

/// The filename for the favorites JSON file within the data directory.
pub const FAVORITES_FILENAME: &str = "favorites.json";

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("failed to write favorites: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode favorites: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct Favorites {
    path: Option<PathBuf>,
    ids: Vec<TrackId>,
}

impl Favorites {
    /// Favorites that are never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn load(path: PathBuf) -> Self {
        let ids: Vec<TrackId> = if path.exists() {
            match File::open(&path)
                .map_err(FavoritesError::from)
                .and_then(|f| Ok(serde_json::from_reader(BufReader::new(f))?))
            {
                Ok(ids) => ids,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unreadable favorites");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        debug!(count = ids.len(), "favorites loaded");
        Self {
            path: Some(path),
            ids,
        }
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    /// Add or remove `id` and persist. Returns whether `id` is now a favorite.
    ///
    /// The in-memory list is updated even when saving fails.
    pub fn toggle(&mut self, id: &TrackId) -> Result<bool, FavoritesError> {
        let now_favorite = match self.ids.iter().position(|f| f == id) {
            Some(pos) => {
                self.ids.remove(pos);
                false
            }
            None => {
                self.ids.push(id.clone());
                true
            }
        };
        self.save()?;
        Ok(now_favorite)
    }

    fn save(&self) -> Result<(), FavoritesError> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &self.ids)?;
        Ok(())
    }
}
