//! The capability the audio binding drives.

use tracing::debug;

use super::types::{EventSender, ResourceError, ResourceEvent};

/// One playable-audio resource: a transport that accepts commands and
/// reports what happened through the attached event sender.
///
/// `play` never fails synchronously; a refusal arrives later as
/// `ResourceEvent::PlayRejected`.
pub trait AudioResource {
    /// Start delivering events to `events`. Replaces any previous observer.
    fn attach(&mut self, events: EventSender);
    /// Stop delivering events.
    fn detach(&mut self);

    /// Locator currently assigned, if any.
    fn source(&self) -> Option<&str>;
    fn set_source(&mut self, locator: &str);
    fn clear_source(&mut self);

    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    /// Seconds from the start of the source.
    fn set_position(&mut self, seconds: f64);
    fn position(&self) -> f64;

    /// Give the resource a chance to emit periodic notifications.
    fn poll(&mut self) {}
}

impl<R: AudioResource + ?Sized> AudioResource for Box<R> {
    fn attach(&mut self, events: EventSender) {
        (**self).attach(events)
    }
    fn detach(&mut self) {
        (**self).detach()
    }
    fn source(&self) -> Option<&str> {
        (**self).source()
    }
    fn set_source(&mut self, locator: &str) {
        (**self).set_source(locator)
    }
    fn clear_source(&mut self) {
        (**self).clear_source()
    }
    fn play(&mut self) {
        (**self).play()
    }
    fn pause(&mut self) {
        (**self).pause()
    }
    fn stop(&mut self) {
        (**self).stop()
    }
    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }
    fn set_position(&mut self, seconds: f64) {
        (**self).set_position(seconds)
    }
    fn position(&self) -> f64 {
        (**self).position()
    }
    fn poll(&mut self) {
        (**self).poll()
    }
}

/// Resource used when no output device could be opened. It keeps track of
/// the assigned source and position but refuses every play command.
#[derive(Debug, Default)]
pub struct NullResource {
    events: Option<EventSender>,
    source: Option<String>,
    position: f64,
    reason: String,
}

impl NullResource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Self::default()
        }
    }
}

impl AudioResource for NullResource {
    fn attach(&mut self, events: EventSender) {
        self.events = Some(events);
    }

    fn detach(&mut self) {
        self.events = None;
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn set_source(&mut self, locator: &str) {
        self.source = Some(locator.to_string());
        self.position = 0.0;
    }

    fn clear_source(&mut self) {
        self.source = None;
        self.position = 0.0;
    }

    fn play(&mut self) {
        debug!(reason = %self.reason, "null resource refusing play");
        if let Some(tx) = &self.events {
            let _ = tx.send(ResourceEvent::PlayRejected(ResourceError::Output(
                self.reason.clone(),
            )));
        }
    }

    fn pause(&mut self) {}

    fn stop(&mut self) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn position(&self) -> f64 {
        self.position
    }
}
