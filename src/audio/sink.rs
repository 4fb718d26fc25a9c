//! `rodio`-backed audio resource.
//!
//! Sources are decoded when assigned. Seeking goes through `Sink::try_seek`
//! and falls back to rebuilding the sink with `Source::skip_duration`, which
//! is also how a drained sink is brought back.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lofty::prelude::*;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use super::resource::AudioResource;
use super::types::{EventSender, ResourceError, ResourceEvent};

pub struct RodioResource {
    stream: OutputStream,
    sink: Option<Sink>,
    locator: Option<String>,
    path: Option<PathBuf>,
    events: Option<EventSender>,
    volume: f32,
    paused: bool,
    /// Where the current sink started inside the source.
    offset: Duration,
    total: Option<Duration>,
    ended: bool,
    tick: Duration,
    last_tick: Instant,
}

impl RodioResource {
    /// Open the default output device. Progress is reported every `tick`
    /// while playing.
    pub fn open(tick: Duration) -> Result<Self, ResourceError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| ResourceError::Output(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped, which would land
        // on top of the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            locator: None,
            path: None,
            events: None,
            volume: 1.0,
            paused: true,
            offset: Duration::ZERO,
            total: None,
            ended: false,
            tick,
            last_tick: Instant::now(),
        })
    }

    fn emit(&self, event: ResourceEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Replace the sink with a fresh one positioned at `start_at`, keeping
    /// the current volume and paused state.
    fn load_at(&mut self, start_at: Duration) -> Result<(), ResourceError> {
        let path = self.path.as_deref().ok_or(ResourceError::NoSource)?;
        let (sink, total) = create_sink_at(&self.stream, path, start_at)?;
        sink.set_volume(self.volume);
        if !self.paused {
            sink.play();
        }

        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.offset = start_at;
        self.ended = false;
        if total.is_some() {
            self.total = total;
        }
        Ok(())
    }

    fn drained(&self) -> bool {
        self.sink.as_ref().map_or(true, Sink::empty)
    }
}

/// Decode `path` into a paused `Sink` that starts playback at `start_at`.
/// Also returns the decoder's idea of the total length.
fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), ResourceError> {
    let file = File::open(path).map_err(|e| ResourceError::Open {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| ResourceError::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.append(decoder.skip_duration(start_at));
    Ok((sink, total))
}

/// Map a locator to a local file. Only plain paths and `file://` URIs are
/// playable.
fn locator_path(locator: &str) -> Result<PathBuf, ResourceError> {
    if let Some(rest) = locator.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if locator.contains("://") {
        return Err(ResourceError::UnsupportedLocator(locator.to_string()));
    }
    Ok(PathBuf::from(locator))
}

/// Where a seek to `seconds` lands: negative or NaN goes to the start,
/// anything past `total` (or past what a `Duration` holds) goes to the end.
pub(super) fn seek_position(seconds: f64, total: Option<Duration>) -> Duration {
    let target = if seconds.is_nan() || seconds <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    };
    total.map_or(target, |total| target.min(total))
}

fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

impl AudioResource for RodioResource {
    fn attach(&mut self, events: EventSender) {
        self.events = Some(events);
    }

    fn detach(&mut self) {
        self.events = None;
    }

    fn source(&self) -> Option<&str> {
        self.locator.as_deref()
    }

    fn set_source(&mut self, locator: &str) {
        self.clear_source();
        self.locator = Some(locator.to_string());

        let path = match locator_path(locator) {
            Ok(path) => path,
            Err(e) => {
                self.emit(ResourceEvent::Error(e));
                return;
            }
        };
        self.path = Some(path.clone());

        if let Err(e) = self.load_at(Duration::ZERO) {
            self.emit(ResourceEvent::Error(e));
            return;
        }

        self.total = self.total.or_else(|| probe_duration(&path));
        let duration = self.total.map_or(f64::INFINITY, |d| d.as_secs_f64());
        debug!(source = %locator, duration, "source decoded");
        self.emit(ResourceEvent::MetadataLoaded { duration });
    }

    fn clear_source(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.locator = None;
        self.path = None;
        self.total = None;
        self.offset = Duration::ZERO;
        self.ended = false;
        self.paused = true;
    }

    fn play(&mut self) {
        if self.path.is_none() {
            self.emit(ResourceEvent::PlayRejected(ResourceError::NoSource));
            return;
        }

        self.paused = false;
        // Playing a drained (or never decoded) source starts it over.
        if self.drained() {
            if let Err(e) = self.load_at(Duration::ZERO) {
                self.paused = true;
                self.emit(ResourceEvent::PlayRejected(e));
                return;
            }
        }

        if let Some(sink) = &self.sink {
            sink.play();
        }
        self.last_tick = Instant::now();
    }

    fn pause(&mut self) {
        self.paused = true;
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        self.paused = true;
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.offset = Duration::ZERO;
        self.ended = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn set_position(&mut self, seconds: f64) {
        if self.path.is_none() {
            return;
        }

        let target = seek_position(seconds, self.total);

        let seeked = match &self.sink {
            Some(sink) if !sink.empty() => sink.try_seek(target).is_ok(),
            _ => false,
        };
        if seeked {
            // The sink's own position now counts from the start of the source.
            self.offset = Duration::ZERO;
            self.ended = false;
            return;
        }

        debug!(?target, "rebuilding sink to seek");
        if let Err(e) = self.load_at(target) {
            self.emit(ResourceEvent::Error(e));
        }
    }

    fn position(&self) -> f64 {
        self.sink
            .as_ref()
            .map_or(0.0, |sink| (self.offset + sink.get_pos()).as_secs_f64())
    }

    fn poll(&mut self) {
        if self.paused || self.sink.is_none() {
            return;
        }

        if self.drained() {
            if !self.ended {
                self.ended = true;
                self.paused = true;
                self.emit(ResourceEvent::Ended);
            }
            return;
        }

        if self.last_tick.elapsed() >= self.tick {
            self.last_tick = Instant::now();
            self.emit(ResourceEvent::TimeUpdate);
        }
    }
}
