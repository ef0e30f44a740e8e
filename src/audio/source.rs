//! Opening media locators and building `rodio` sinks from them.
//!
//! Local files are decoded straight from disk. Remote tracks are downloaded
//! once into memory so seeking can rebuild the decoder without refetching.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::debug;

use crate::catalog::is_remote_locator;

use super::error::AudioError;

#[derive(Clone)]
pub(super) enum Media {
    File(PathBuf),
    Memory { url: String, bytes: Arc<[u8]> },
}

impl Media {
    /// Resolve `locator` into something the decoder can read.
    pub(super) fn fetch(locator: &str) -> Result<Self, AudioError> {
        if is_remote_locator(locator) {
            let network = |source| AudioError::Network {
                url: locator.to_string(),
                source,
            };
            let bytes = reqwest::blocking::get(locator)
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.bytes())
                .map_err(network)?;
            debug!(url = locator, len = bytes.len(), "downloaded track");
            Ok(Self::Memory {
                url: locator.to_string(),
                bytes: Arc::from(bytes.as_ref()),
            })
        } else {
            let path = locator.strip_prefix("file://").unwrap_or(locator);
            Ok(Self::File(PathBuf::from(path)))
        }
    }

    fn locator(&self) -> String {
        match self {
            Media::File(p) => p.display().to_string(),
            Media::Memory { url, .. } => url.clone(),
        }
    }

    /// Track length from the file's tags, for decoders that cannot report it.
    pub(super) fn probe_duration(&self) -> Option<Duration> {
        match self {
            Media::File(path) => lofty::read_from_path(path)
                .ok()
                .map(|tagged| tagged.properties().duration())
                .filter(|d| !d.is_zero()),
            Media::Memory { .. } => None,
        }
    }
}

/// Create a paused `Sink` for `media` that starts playback at `start_at`.
///
/// Returns the sink and the decoder-reported total duration, if any.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    media: &Media,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), AudioError> {
    match media {
        Media::File(path) => {
            let file = File::open(path).map_err(|source| AudioError::Open {
                path: path.display().to_string(),
                source,
            })?;
            sink_from(stream, BufReader::new(file), media, start_at)
        }
        Media::Memory { bytes, .. } => sink_from(stream, Cursor::new(bytes.clone()), media, start_at),
    }
}

fn sink_from<R>(
    stream: &OutputStream,
    reader: R,
    media: &Media,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), AudioError>
where
    R: Read + Seek + Send + Sync + 'static,
{
    let decoder = Decoder::new(reader).map_err(|e| AudioError::Decode {
        locator: media.locator(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}
