//! Secondary audio output for live radio streams.
//!
//! Runs on its own thread with its own output stream so it never interferes
//! with track playback.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use rodio::{Decoder, OutputStreamBuilder, Sink};
use tracing::{error, info, warn};

use crate::audio::AudioError;

use super::state::RadioAction;

#[derive(Debug)]
enum RadioCmd {
    Action(RadioAction),
    Quit,
}

/// Status published by the radio thread.
#[derive(Debug, Clone, Default)]
pub struct RadioStatus {
    pub connecting: bool,
    pub error: Option<String>,
}

pub type RadioHandle = Arc<Mutex<RadioStatus>>;

/// A live HTTP body. Only position queries are supported as seeks.
struct LiveStream {
    inner: Mutex<reqwest::blocking::Response>,
    pos: u64,
}

impl Read for LiveStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let inner = self
            .inner
            .get_mut()
            .map_err(|_| io::Error::other("radio stream poisoned"))?;
        let n = inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for LiveStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::Current(0) => Ok(self.pos),
            SeekFrom::Start(p) if p == self.pos => Ok(self.pos),
            _ => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "live stream is not seekable",
            )),
        }
    }
}

fn open_station(url: &str, mixer: &rodio::mixer::Mixer) -> Result<Sink, AudioError> {
    let network = |source| AudioError::Network {
        url: url.to_string(),
        source,
    };
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(network)?;
    let mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let stream = LiveStream {
        inner: Mutex::new(response),
        pos: 0,
    };
    let mut builder = Decoder::builder().with_data(stream).with_seekable(false);
    if let Some(ref m) = mime {
        builder = builder.with_mime_type(m);
    }
    let decoder = builder.build().map_err(|e| AudioError::Decode {
        locator: url.to_string(),
        reason: e.to_string(),
    })?;

    let sink = Sink::connect_new(mixer);
    sink.append(decoder);
    Ok(sink)
}

pub struct RadioPlayer {
    tx: Sender<RadioCmd>,
    status: RadioHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RadioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<RadioCmd>();
        let status: RadioHandle = Arc::new(Mutex::new(RadioStatus::default()));
        let join = spawn_radio_thread(rx, status.clone());
        Self {
            tx,
            status,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn status_handle(&self) -> RadioHandle {
        self.status.clone()
    }

    pub fn apply(&self, action: RadioAction) {
        let _ = self.tx.send(RadioCmd::Action(action));
    }

    pub fn quit(&self) {
        let _ = self.tx.send(RadioCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

fn set_status(status: &RadioHandle, connecting: bool, error: Option<String>) {
    if let Ok(mut s) = status.lock() {
        s.connecting = connecting;
        s.error = error;
    }
}

fn spawn_radio_thread(rx: Receiver<RadioCmd>, status: RadioHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        // The output device is opened lazily: most sessions never touch the radio.
        let mut stream: Option<rodio::OutputStream> = None;
        let mut sink: Option<Sink> = None;

        while let Ok(cmd) = rx.recv() {
            match cmd {
                RadioCmd::Action(RadioAction::Tune(url)) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    if stream.is_none() {
                        match OutputStreamBuilder::open_default_stream() {
                            Ok(mut s) => {
                                s.log_on_drop(false);
                                stream = Some(s);
                            }
                            Err(e) => {
                                let err = AudioError::Device(e.to_string());
                                error!(%err, "radio output unavailable");
                                set_status(&status, false, Some(err.to_string()));
                                continue;
                            }
                        }
                    }
                    let Some(ref out) = stream else {
                        continue;
                    };

                    set_status(&status, true, None);
                    info!(url, "tuning radio");
                    match open_station(&url, out.mixer()) {
                        Ok(s) => {
                            s.play();
                            sink = Some(s);
                            set_status(&status, false, None);
                        }
                        Err(err) => {
                            warn!(%err, "radio station failed");
                            set_status(&status, false, Some(err.to_string()));
                        }
                    }
                }
                RadioCmd::Action(RadioAction::Pause) => {
                    if let Some(ref s) = sink {
                        s.pause();
                    }
                }
                RadioCmd::Action(RadioAction::Resume) => {
                    if let Some(ref s) = sink {
                        s.play();
                    }
                }
                RadioCmd::Quit => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    break;
                }
            }
        }
    })
}
