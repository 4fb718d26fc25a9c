//! Keeps one audio resource in step with the playback store.
//!
//! The binding is the only code allowed to command the resource. Store
//! changes flow in through `reconcile`; resource events flow back through
//! `pump`, which always reconciles outstanding store changes (pending seeks
//! in particular) before it lets an event touch the store.

use std::sync::mpsc::{self, Receiver};

use tracing::{debug, error, info, warn};

use crate::store::{Changes, PlayerStore};

use super::resource::AudioResource;
use super::types::{ResourceEvent, ResourceState};

pub struct AudioBinding<R: AudioResource> {
    resource: R,
    events: Receiver<ResourceEvent>,
    state: ResourceState,
    /// Last valid duration reported for the current source (seconds).
    duration: f64,
}

impl<R: AudioResource> AudioBinding<R> {
    /// Take ownership of `resource`, attach to its events and bring it in
    /// line with everything the store currently declares.
    pub fn mount(mut resource: R, store: &mut PlayerStore) -> Self {
        let (tx, rx) = mpsc::channel();
        resource.attach(tx);

        let mut binding = Self {
            resource,
            events: rx,
            state: ResourceState::Idle,
            duration: 0.0,
        };

        // Everything is new to a freshly mounted binding.
        store.take_changes();
        binding.apply(Changes::all(), store);
        binding.reconcile(store);
        binding
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Apply every store change recorded since the last call.
    pub fn reconcile(&mut self, store: &mut PlayerStore) {
        // Applying changes can itself produce changes (an error pausing the
        // store, for instance), so run until the store is quiet.
        loop {
            let changes = store.take_changes();
            if !changes.any() {
                break;
            }
            self.apply(changes, store);
        }
    }

    /// Let the resource emit its periodic notifications, then handle every
    /// queued event in order.
    pub fn pump(&mut self, store: &mut PlayerStore) {
        self.resource.poll();
        while let Ok(event) = self.events.try_recv() {
            self.reconcile(store);
            self.handle_event(event, store);
        }
        self.reconcile(store);
    }

    /// Tear the binding down explicitly. Dropping it has the same effect.
    pub fn unmount(self) {}

    fn apply(&mut self, changes: Changes, store: &mut PlayerStore) {
        if changes.volume {
            self.sync_volume(store);
        }
        if changes.track {
            self.sync_track(store);
        }
        if changes.seek {
            self.apply_pending_seek(store);
        }
        if changes.playing || changes.track {
            self.sync_playing(store);
        }
    }

    fn sync_volume(&mut self, store: &PlayerStore) {
        let requested = store.volume();
        let volume = if requested.is_nan() {
            0.0
        } else {
            requested.clamp(0.0, 1.0)
        };
        debug!(requested, applied = volume, "volume");
        self.resource.set_volume(volume);
    }

    fn sync_track(&mut self, store: &PlayerStore) {
        match store.current_track() {
            Some(track) => {
                if self.resource.source() == Some(track.source.as_str()) {
                    return;
                }
                info!(track = %track.id, source = %track.source, "loading track");
                self.resource.set_source(&track.source);
                self.state = ResourceState::Loading;
                self.duration = 0.0;
            }
            None => {
                if self.resource.source().is_none() {
                    return;
                }
                debug!("no current track, releasing source");
                self.resource.pause();
                self.resource.clear_source();
                self.state = ResourceState::Idle;
                self.duration = 0.0;
            }
        }
    }

    fn sync_playing(&mut self, store: &PlayerStore) {
        if store.current_track().is_none() {
            return;
        }
        if store.is_playing() {
            if self.state == ResourceState::Ended {
                self.state = ResourceState::Ready;
            }
            self.resource.play();
        } else {
            self.resource.pause();
        }
    }

    fn apply_pending_seek(&mut self, store: &mut PlayerStore) {
        let Some(target) = store.pending_seek() else {
            return;
        };
        debug!(target, "seek");
        self.resource.set_position(target);
        store.clear_seek_request();
        store.set_progress(self.resource.position(), self.duration);
    }

    fn handle_event(&mut self, event: ResourceEvent, store: &mut PlayerStore) {
        match event {
            ResourceEvent::MetadataLoaded { duration } => {
                if !(duration.is_finite() && duration >= 0.0) {
                    debug!(duration, "ignoring unusable duration");
                    return;
                }
                self.duration = duration;
                if self.state == ResourceState::Loading {
                    self.state = ResourceState::Ready;
                }
                store.set_progress(self.resource.position(), duration);
            }
            ResourceEvent::TimeUpdate => {
                store.set_progress(self.resource.position(), self.duration);
            }
            ResourceEvent::Ended => {
                if self.state == ResourceState::Ended {
                    debug!("already ended");
                    return;
                }
                info!("track finished");
                self.state = ResourceState::Ended;
                store.pause();
                store.seek_to(0.0);
                self.resource.set_position(0.0);
                store.set_progress(0.0, self.duration);
            }
            ResourceEvent::Error(e) => {
                error!(error = %e, "audio playback error");
                store.pause();
            }
            ResourceEvent::PlayRejected(e) => {
                // The store keeps declaring "playing"; nothing corrects it.
                warn!(error = %e, "play failed");
            }
        }
    }
}

impl<R: AudioResource> Drop for AudioBinding<R> {
    fn drop(&mut self) {
        self.resource.detach();
        self.resource.stop();
        debug!("audio binding released");
    }
}
