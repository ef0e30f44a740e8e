use std::time::{Duration, Instant};

use crate::catalog::Track;

/// Transient popup, dismissed once its time is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Popup frame title, e.g. "now playing".
    pub title: String,
    pub headline: String,
    pub detail: String,
    shown_at: Instant,
    ttl: Duration,
}

impl Notice {
    pub fn new(
        title: String,
        headline: String,
        detail: String,
        now: Instant,
        ttl: Duration,
    ) -> Self {
        Self {
            title,
            headline,
            detail,
            shown_at: now,
            ttl,
        }
    }

    /// "Now playing" popup naming the track and its artist.
    pub fn now_playing(track: &Track, now: Instant, ttl: Duration) -> Self {
        Self::new(
            "now playing".to_string(),
            track.title.clone(),
            track.artist.clone(),
            now,
            ttl,
        )
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}
