//! Reading and validating the track catalog document.
//!
//! The document is a JSON array of objects with `id`, `title`, `artist`,
//! `country`, `genre` and `url`. Entries are validated one by one: a bad entry
//! is rejected and reported, it never fails the whole load.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::model::{Catalog, Track, TrackId, is_remote_locator};

/// Where the catalog document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// `http(s)://` locators are fetched, everything else is a filesystem path.
    pub fn parse(s: &str) -> Self {
        if is_remote_locator(s) {
            Self::Url(s.trim().to_string())
        } else {
            Self::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(p) => write!(f, "{}", p.display()),
            CatalogSource::Url(u) => f.write_str(u),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch catalog {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog must be a JSON array of tracks")]
    NotAnArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Not an object, or a field had the wrong type.
    Malformed,
    MissingField(&'static str),
    DuplicateId(TrackId),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Malformed => f.write_str("malformed entry"),
            RejectReason::MissingField(name) => write!(f, "missing `{name}`"),
            RejectReason::DuplicateId(id) => write!(f, "duplicate id `{id}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// 1-based position of the entry in the document.
    pub position: usize,
    pub reason: RejectReason,
}

/// Outcome of validating a catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
}

impl LoadReport {
    pub fn summary(&self) -> String {
        if self.rejected.is_empty() {
            format!("{} tracks", self.accepted)
        } else {
            format!(
                "{} tracks ({} invalid entries skipped)",
                self.accepted,
                self.rejected.len()
            )
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(serde_json::Number),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, RejectReason> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(RejectReason::MissingField(name)),
    }
}

/// A validated entry whose id may still need to be generated.
struct Validated {
    id: Option<TrackId>,
    track: Track,
}

fn validate(raw: RawTrack) -> Result<Validated, RejectReason> {
    let title = required(raw.title, "title")?;
    let artist = required(raw.artist, "artist")?;
    let url = required(raw.url, "url")?;

    let id = match raw.id {
        Some(RawId::Number(n)) => Some(TrackId(n.to_string())),
        Some(RawId::Text(s)) if !s.trim().is_empty() => Some(TrackId(s.trim().to_string())),
        _ => None,
    };

    Ok(Validated {
        id,
        track: Track {
            id: TrackId(String::new()),
            title,
            artist,
            country: raw.country.unwrap_or_default(),
            genre: raw.genre.unwrap_or_default(),
            url: url.trim().to_string(),
        },
    })
}

/// `#<position>`, or `#<position>.<n>` when a document id already took it.
fn generated_id(position: usize, taken: &HashSet<TrackId>) -> TrackId {
    let base = TrackId(format!("#{position}"));
    if !taken.contains(&base) {
        return base;
    }
    (2usize..)
        .map(|n| TrackId(format!("#{position}.{n}")))
        .find(|id| !taken.contains(id))
        .unwrap_or(base)
}

/// Parse and validate a catalog document.
///
/// Explicit ids are checked for duplicates first; entries without one get a
/// generated id afterwards, so they never collide with or shadow a real id.
pub fn parse_catalog(json: &str) -> Result<(Catalog, LoadReport), CatalogError> {
    let doc: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(entries) = doc else {
        return Err(CatalogError::NotAnArray);
    };

    let mut tracks: Vec<Track> = Vec::with_capacity(entries.len());
    let mut unnamed: Vec<(usize, usize)> = Vec::new();
    let mut seen: HashSet<TrackId> = HashSet::new();
    let mut report = LoadReport::default();

    for (i, entry) in entries.into_iter().enumerate() {
        let position = i + 1;
        let outcome = serde_json::from_value::<RawTrack>(entry)
            .map_err(|_| RejectReason::Malformed)
            .and_then(validate)
            .and_then(|v| match v.id {
                Some(id) if !seen.insert(id.clone()) => Err(RejectReason::DuplicateId(id)),
                Some(id) => Ok(Track { id, ..v.track }),
                None => {
                    unnamed.push((tracks.len(), position));
                    Ok(v.track)
                }
            });

        match outcome {
            Ok(track) => tracks.push(track),
            Err(reason) => {
                debug!(position, %reason, "rejected catalog entry");
                report.rejected.push(Rejection { position, reason });
            }
        }
    }

    for (slot, position) in unnamed {
        let id = generated_id(position, &seen);
        seen.insert(id.clone());
        tracks[slot].id = id;
    }

    report.accepted = tracks.len();
    Ok((Catalog::new(tracks), report))
}

fn read_source(source: &CatalogSource) -> Result<String, CatalogError> {
    match source {
        CatalogSource::File(path) => {
            std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                path: path.clone(),
                source,
            })
        }
        CatalogSource::Url(url) => {
            let http = |source| CatalogError::Http {
                url: url.clone(),
                source,
            };
            reqwest::blocking::get(url)
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text())
                .map_err(http)
        }
    }
}

/// Read the catalog from `source` and validate every entry.
pub fn load(source: &CatalogSource) -> Result<(Catalog, LoadReport), CatalogError> {
    info!(%source, "loading catalog");
    let body = read_source(source)?;
    let (catalog, report) = parse_catalog(&body)?;
    if report.rejected.is_empty() {
        info!(tracks = report.accepted, "catalog loaded");
    } else {
        warn!(
            tracks = report.accepted,
            rejected = report.rejected.len(),
            "catalog loaded with invalid entries"
        );
    }
    Ok((catalog, report))
}
