use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_ALBUM_SIZE;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/jukebox/config.toml` or `~/.config/jukebox/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `JUKEBOX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub radio: RadioSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Path or `http(s)` URL of the JSON track list. The first CLI argument wins over this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Tracks per album.
    pub album_size: usize,
    /// Cover labels assigned to albums in rotation.
    pub covers: Vec<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source: None,
            album_size: DEFAULT_ALBUM_SIZE,
            covers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Crossfade duration when switching tracks (milliseconds).
    /// Set to 0 to disable crossfade.
    pub crossfade_ms: u64,
    /// Number of steps used to fade volumes (higher = smoother, more CPU).
    pub crossfade_steps: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Volume at startup, in percent.
    pub initial_volume: u8,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            crossfade_ms: 250,
            crossfade_steps: 10,
            quit_fade_out_ms: 500,
            initial_volume: 80,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered over the header banner.
    pub header_text: String,
    /// How long the "now playing" popup stays up (milliseconds).
    pub notice_ms: u64,
    /// Whether the header wave banner animates.
    pub animations: bool,
    /// Whether albums are listed expanded after each filter change.
    pub albums_start_expanded: bool,
    /// Number of recommended tracks shown in the side panel.
    pub recommendations: usize,
    /// Show the recently played / recommended / radio panel.
    pub side_panel: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ jukebox ~ ".to_string(),
            notice_ms: 2500,
            animations: true,
            albums_start_expanded: true,
            recommendations: 5,
            side_panel: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `h` / `l`.
    pub seek_seconds: u64,
    /// Volume change per `-` / `+` press, in percent.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RadioStation {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RadioSettings {
    pub stations: Vec<RadioStation>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory for the favorites file and the log. Defaults to the XDG data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Persist favorites across runs.
    pub favorites: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            favorites: true,
        }
    }
}
