use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use crate::config::AudioSettings;

use super::error::AudioError;
use super::source::{Media, create_sink_at};
use super::types::{AudioCmd, PlaybackHandle, fraction_target, seek_target};

/// State owned by the audio thread.
struct Engine {
    stream: OutputStream,
    sink: Option<Sink>,
    media: Option<Media>,
    index: Option<usize>,
    paused: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    duration: Option<Duration>,
    volume: f32,
    playback_info: PlaybackHandle,
    settings: AudioSettings,
}

impl Engine {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn publish(&self) {
        if let Ok(mut info) = self.playback_info.lock() {
            info.index = self.index;
            info.elapsed = self.elapsed();
            info.duration = self.duration;
            info.playing = self.sink.is_some() && !self.paused;
        }
    }

    fn fail(&mut self, err: AudioError) {
        error!(%err, "playback failed");
        self.stop();
        if let Ok(mut info) = self.playback_info.lock() {
            info.error = Some(err.to_string());
        }
    }

    fn play(&mut self, index: usize, locator: &str) {
        let media = match Media::fetch(locator) {
            Ok(m) => m,
            Err(e) => return self.fail(e),
        };
        let (new_sink, total) = match create_sink_at(&self.stream, &media, Duration::ZERO) {
            Ok(s) => s,
            Err(e) => return self.fail(e),
        };

        self.crossfade_into(&new_sink);

        new_sink.set_volume(self.volume);
        new_sink.play();
        self.duration = total.or_else(|| media.probe_duration());
        self.sink = Some(new_sink);
        self.media = Some(media);
        self.index = Some(index);
        self.paused = false;
        self.started_at = Some(Instant::now());
        self.accumulated = Duration::ZERO;

        info!(index, locator, duration = ?self.duration, "playing");
        if let Ok(mut info) = self.playback_info.lock() {
            info.error = None;
        }
        self.publish();
    }

    // Fade the old sink out while the new one comes in; hard swap when paused or disabled.
    fn crossfade_into(&mut self, new_sink: &Sink) {
        let Some(old_sink) = self.sink.take() else {
            return;
        };
        let crossfade_ms = self.settings.crossfade_ms;
        let steps = self.settings.crossfade_steps.max(1);

        if self.paused || crossfade_ms == 0 {
            old_sink.stop();
            return;
        }

        new_sink.set_volume(0.0);
        new_sink.play();
        // Fade volumes in a short blocking loop; audio continues in rodio's mixer thread.
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            old_sink.set_volume(self.volume * (1.0 - t));
            new_sink.set_volume(self.volume * t);
            thread::sleep(Duration::from_millis((crossfade_ms / steps).max(1)));
        }
        old_sink.stop();
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.media = None;
        self.index = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.duration = None;
        self.publish();
    }

    fn toggle_pause(&mut self) {
        let Some(ref s) = self.sink else {
            return;
        };
        if self.paused {
            s.play();
            self.started_at = Some(Instant::now());
        } else {
            s.pause();
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
        }
        self.paused = !self.paused;
        self.publish();
    }

    // Scrubbing: rebuild the current sink and skip into the media.
    fn seek(&mut self, target: Duration) {
        let Some(media) = self.media.clone() else {
            return;
        };
        let new_sink = match create_sink_at(&self.stream, &media, target) {
            Ok((s, _)) => s,
            Err(e) => return self.fail(e),
        };
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        new_sink.set_volume(self.volume);
        if self.paused {
            self.started_at = None;
        } else {
            new_sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(new_sink);
        self.accumulated = target;
        debug!(position = ?target, "seeked");
        self.publish();
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(ref s) = self.sink {
            s.set_volume(self.volume);
        }
        self.publish();
    }

    /// Periodic time update; reports the end of the track as stopped.
    fn tick(&mut self) {
        let finished = matches!(self.sink, Some(ref s) if !self.paused && s.empty());
        if finished {
            debug!(index = ?self.index, "track finished");
            self.stop();
        } else {
            self.publish();
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(ref s) = self.sink {
            fade_out_sink(s, self.volume, fade_out_ms);
            s.stop();
        }
        // Update shared state so the UI doesn't keep showing Playing.
        if let Ok(mut info) = self.playback_info.lock() {
            info.playing = false;
        }
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let err = AudioError::Device(e.to_string());
                error!(%err, "audio thread not started");
                if let Ok(mut info) = playback_info.lock() {
                    info.error = Some(err.to_string());
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let volume = f32::from(audio_settings.initial_volume.min(100)) / 100.0;
        let mut engine = Engine {
            stream,
            sink: None,
            media: None,
            index: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            duration: None,
            volume,
            playback_info,
            settings: audio_settings,
        };
        engine.publish();

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Play { index, locator } => engine.play(index, &locator),
                    AudioCmd::Stop => engine.stop(),
                    AudioCmd::TogglePause => engine.toggle_pause(),
                    AudioCmd::SeekBy(secs) => {
                        if engine.sink.is_some() {
                            let target = seek_target(engine.elapsed(), secs, engine.duration);
                            engine.seek(target);
                        }
                    }
                    AudioCmd::SeekTo(fraction) => match engine.duration {
                        Some(total) if engine.sink.is_some() => {
                            engine.seek(fraction_target(total, fraction));
                        }
                        _ => warn!("seek ignored: duration unknown"),
                    },
                    AudioCmd::SetVolume(v) => engine.set_volume(v),
                    AudioCmd::Quit { fade_out_ms } => {
                        engine.quit(fade_out_ms);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => engine.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
