//! Audio-related small types and handles.
//!
//! This module defines the commands understood by the audio thread and the
//! playback snapshot it shares with the UI.

use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Load `locator` and start playing it; `index` is the catalog index reported back.
    Play { index: usize, locator: String },
    /// Stop playback immediately.
    Stop,
    /// Toggle pause/resume.
    TogglePause,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i64),
    /// Seek to a fraction (0.0..=1.0) of the track duration. Ignored when the duration is unknown.
    SeekTo(f64),
    /// Set the output volume (0.0..=1.0).
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Catalog index of the loaded track (if any).
    pub index: Option<usize>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Total length of the current track when known.
    pub duration: Option<Duration>,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Last playback failure, cleared when a track starts successfully.
    pub error: Option<String>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            index: None,
            elapsed: Duration::ZERO,
            duration: None,
            playing: false,
            error: None,
        }
    }
}

impl PlaybackInfo {
    /// Elapsed fraction of the track, when the duration is known.
    pub fn progress(&self) -> Option<f64> {
        let total = self.duration?.as_secs_f64();
        if total <= 0.0 {
            return None;
        }
        Some((self.elapsed.as_secs_f64() / total).clamp(0.0, 1.0))
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Clamp a requested seek target to the track bounds.
pub(crate) fn seek_target(
    elapsed: Duration,
    delta_secs: i64,
    duration: Option<Duration>,
) -> Duration {
    let cur = elapsed.as_secs() as i64;
    let mut new = Duration::from_secs((cur + delta_secs).max(0) as u64);
    if let Some(total) = duration {
        new = new.min(total);
    }
    new
}

/// Absolute position for a fraction of `duration`.
pub(crate) fn fraction_target(duration: Duration, fraction: f64) -> Duration {
    duration.mul_f64(fraction.clamp(0.0, 1.0))
}
