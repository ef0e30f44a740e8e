//! Application model types: `App` and its view state.
//!
//! `App` is the single explicit state record of the player: the loaded catalog,
//! the active filter criteria, the albums derived from them, the selection and
//! everything the side panel shows. Input handlers mutate it; the UI only reads it.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::audio::{AudioCmd, PlaybackHandle, PlaybackInfo};
use crate::catalog::{
    self, Album, Catalog, CatalogError, FilterCriteria, FilterOptions, LoadReport, Track,
};
use crate::config::Settings;
use crate::favorites::{Favorites, FavoritesError};
use crate::radio::RadioState;

use super::history::{History, recommend};
use super::notice::Notice;

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Progress of the one-shot catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready(LoadReport),
    Failed(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    /// Keystrokes edit the free-text query.
    Search,
}

/// One line of the catalog view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Row {
    Album(usize),
    /// `index` is the catalog index of the track.
    Track { album: usize, index: usize },
}

/// Grouping and presentation knobs taken from the settings.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub album_size: usize,
    pub covers: Vec<String>,
    pub start_expanded: bool,
    pub notice_ttl: Duration,
    pub recommendations: usize,
}

impl ViewSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            album_size: settings.catalog.album_size,
            covers: settings.catalog.covers.clone(),
            start_expanded: settings.ui.albums_start_expanded,
            notice_ttl: Duration::from_millis(settings.ui.notice_ms),
            recommendations: settings.ui.recommendations,
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// The main application model.
pub struct App {
    pub catalog: Catalog,
    pub load_state: LoadState,
    pub options: FilterOptions,
    pub criteria: FilterCriteria,
    pub albums: Vec<Album<usize>>,
    expanded: Vec<bool>,

    /// Index into [`App::rows`].
    pub selected: usize,
    pub mode: InputMode,

    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,
    /// Output volume in percent.
    pub volume: u8,

    pub history: History,
    pub recommendations: Vec<usize>,
    pub favorites: Favorites,
    pub notice: Option<Notice>,
    pub radio: RadioState,

    view: ViewSettings,
}

impl App {
    /// Create an `App` waiting for its catalog.
    pub fn new(view: ViewSettings, favorites: Favorites) -> Self {
        Self {
            catalog: Catalog::default(),
            load_state: LoadState::Loading,
            options: FilterOptions::default(),
            criteria: FilterCriteria::default(),
            albums: Vec::new(),
            expanded: Vec::new(),

            selected: 0,
            mode: InputMode::Browse,

            playback: PlaybackState::Stopped,
            playback_handle: None,
            volume: 100,

            history: History::default(),
            recommendations: Vec::new(),
            favorites,
            notice: None,
            radio: RadioState::default(),

            view,
        }
    }

    /// Install the result of the catalog load. Filter options are derived here, once.
    pub fn catalog_loaded(&mut self, result: Result<(Catalog, LoadReport), CatalogError>) {
        match result {
            Ok((catalog, report)) => {
                self.options = FilterOptions::from_tracks(catalog.tracks());
                self.catalog = catalog;
                self.load_state = LoadState::Ready(report);
                self.apply_filters();
            }
            Err(e) => {
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Recompute the visible albums from scratch for the current criteria.
    ///
    /// Expansion state is reset; the selected track stays selected when still visible.
    pub fn apply_filters(&mut self) {
        let keep = self.selected_track();

        self.albums = catalog::view(
            &self.catalog,
            &self.criteria,
            self.view.album_size,
            &self.view.covers,
        );
        self.expanded = vec![self.view.start_expanded; self.albums.len()];

        let rows = self.rows();
        self.selected = keep
            .and_then(|idx| {
                rows.iter()
                    .position(|r| matches!(r, Row::Track { index, .. } if *index == idx))
            })
            .unwrap_or(0);
    }

    /// Number of tracks passing the current filter.
    pub fn visible_count(&self) -> usize {
        self.albums.iter().map(|a| a.len()).sum()
    }

    pub fn is_expanded(&self, album: usize) -> bool {
        self.expanded.get(album).copied().unwrap_or(false)
    }

    /// Flattened view: each album header followed by its tracks when expanded.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.albums.len() + self.visible_count());
        for (a, album) in self.albums.iter().enumerate() {
            rows.push(Row::Album(a));
            if self.is_expanded(a) {
                rows.extend(
                    album
                        .tracks
                        .iter()
                        .map(|&index| Row::Track { album: a, index }),
                );
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<Row> {
        self.rows().get(self.selected).copied()
    }

    pub fn selected_track(&self) -> Option<usize> {
        match self.selected_row() {
            Some(Row::Track { index, .. }) => Some(index),
            _ => None,
        }
    }

    /// Move selection down, wrapping to the first row.
    pub fn next(&mut self) {
        let len = self.rows().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection up, wrapping to the last row.
    pub fn prev(&mut self) {
        let len = self.rows().len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows().len().saturating_sub(1);
    }

    /// Expand or collapse `album`, leaving the cursor on its header.
    pub fn toggle_album(&mut self, album: usize) {
        if let Some(e) = self.expanded.get_mut(album) {
            *e = !*e;
        }
        if let Some(pos) = self.rows().iter().position(|r| *r == Row::Album(album)) {
            self.selected = pos;
        }
    }

    /// Enter on the selection: album headers toggle, tracks are returned for playback.
    pub fn activate(&mut self) -> Option<usize> {
        match self.selected_row()? {
            Row::Album(a) => {
                self.toggle_album(a);
                None
            }
            Row::Track { index, .. } => Some(index),
        }
    }

    /// Toggle the album containing the selection.
    pub fn toggle_selected_album(&mut self) {
        match self.selected_row() {
            Some(Row::Album(a)) | Some(Row::Track { album: a, .. }) => self.toggle_album(a),
            None => {}
        }
    }

    pub fn enter_search(&mut self) {
        self.mode = InputMode::Search;
    }

    /// Leave search mode, keeping the query.
    pub fn exit_search(&mut self) {
        self.mode = InputMode::Browse;
    }

    pub fn push_query_char(&mut self, c: char) {
        self.criteria.query.push(c);
        self.apply_filters();
    }

    pub fn pop_query_char(&mut self) {
        if self.criteria.query.pop().is_some() {
            self.apply_filters();
        }
    }

    /// Clear the query and leave search mode.
    pub fn clear_query(&mut self) {
        self.mode = InputMode::Browse;
        if !self.criteria.query.is_empty() {
            self.criteria.query.clear();
            self.apply_filters();
        }
    }

    pub fn cycle_country(&mut self, forward: bool) {
        let opts = &self.options.countries;
        self.criteria.country = if forward {
            self.criteria.country.cycle_next(opts)
        } else {
            self.criteria.country.cycle_prev(opts)
        };
        self.apply_filters();
    }

    pub fn cycle_genre(&mut self, forward: bool) {
        let opts = &self.options.genres;
        self.criteria.genre = if forward {
            self.criteria.genre.cycle_next(opts)
        } else {
            self.criteria.genre.cycle_prev(opts)
        };
        self.apply_filters();
    }

    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.mode = InputMode::Browse;
        self.apply_filters();
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.catalog.get(index)
    }

    pub fn is_favorite(&self, index: usize) -> bool {
        self.track(index)
            .is_some_and(|t| self.favorites.contains(&t.id))
    }

    /// Toggle the favorite flag of the selected track.
    ///
    /// Returns the new flag, or `None` when no track is selected.
    pub fn toggle_favorite(&mut self) -> Result<Option<bool>, FavoritesError> {
        let Some(index) = self.selected_track() else {
            return Ok(None);
        };
        let Some(track) = self.catalog.get(index) else {
            return Ok(None);
        };
        self.favorites.toggle(&track.id).map(Some)
    }

    /// Record that playback of `index` starts now and build the command for the player.
    ///
    /// Updates history and recommendations and raises the now-playing notice.
    pub fn begin_playback<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        now: Instant,
        rng: &mut R,
    ) -> Option<AudioCmd> {
        let track = self.catalog.get(index)?;
        let cmd = AudioCmd::Play {
            index,
            locator: track.url.clone(),
        };

        self.notice = Some(Notice::now_playing(track, now, self.view.notice_ttl));
        self.history.record(&track.id);
        self.recommendations = recommend(
            &self.catalog,
            index,
            &self.history,
            self.view.recommendations,
            rng,
        );
        self.playback = PlaybackState::Playing;
        Some(cmd)
    }

    /// Show a transient message under the popup title `title`.
    pub fn notify(
        &mut self,
        title: impl Into<String>,
        headline: impl Into<String>,
        detail: impl Into<String>,
        now: Instant,
    ) {
        self.notice = Some(Notice::new(
            title.into(),
            headline.into(),
            detail.into(),
            now,
            self.view.notice_ttl,
        ));
    }

    /// Drop the notice once its time is up.
    pub fn tick(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    /// Change the volume by `delta` percent; returns the new volume as a 0.0..=1.0 factor.
    pub fn change_volume(&mut self, delta: i16) -> f32 {
        let v = (i16::from(self.volume) + delta).clamp(0, 100);
        self.volume = v as u8;
        self.volume_factor()
    }

    pub fn volume_factor(&self) -> f32 {
        f32::from(self.volume) / 100.0
    }

    /// Snapshot of the player state, if a player is attached.
    pub fn now_playing(&self) -> Option<PlaybackInfo> {
        self.playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok().map(|info| info.clone()))
    }

    /// Derive `playback` from the player's shared state.
    pub fn sync_playback(&mut self) {
        if let Some(info) = self.now_playing() {
            self.playback = match (info.index, info.playing) {
                (None, _) => PlaybackState::Stopped,
                (Some(_), true) => PlaybackState::Playing,
                (Some(_), false) => PlaybackState::Paused,
            };
        }
    }
}
