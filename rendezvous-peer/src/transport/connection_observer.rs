use rendezvous_core::{ChannelState, ControlMessage, TrackKind};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Receives transport notifications. Handlers run on the shared executor
/// and must return quickly.
pub trait ConnectionObserver: Send + Sync {
    fn on_track(&self, _kind: TrackKind) {}

    fn on_channel_open(&self, _label: &str) {}

    fn on_channel_message(&self, _label: &str, _message: &ControlMessage) {}

    fn on_channel_close(&self, _label: &str) {}
}

/// Reports every notification through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl ConnectionObserver for LoggingObserver {
    fn on_track(&self, kind: TrackKind) {
        info!("Track {} received", kind);
    }

    fn on_channel_open(&self, label: &str) {
        info!("Data channel '{}' open", label);
    }

    fn on_channel_message(&self, label: &str, message: &ControlMessage) {
        match message {
            ControlMessage::Text(text) => info!("[{}] {}", label, text),
            ControlMessage::Binary(data) => {
                info!("[{}] Not string: {} bytes {:?}", label, data.len(), data)
            }
        }
    }

    fn on_channel_close(&self, label: &str) {
        info!("Data channel '{}' closed", label);
    }
}

/// Fan-out list shared between a facade and its transport callbacks.
///
/// Also remembers the last known state of every data channel it has heard of.
#[derive(Default, Clone)]
pub struct ObserverSet {
    observers: Arc<RwLock<Vec<Arc<dyn ConnectionObserver>>>>,
    channels: Arc<RwLock<HashMap<String, ChannelState>>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, observer: Arc<dyn ConnectionObserver>) {
        self.observers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(observer);
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn track(&self, kind: TrackKind) {
        for observer in self.snapshot() {
            observer.on_track(kind);
        }
    }

    pub fn channel_state(&self, label: &str) -> Option<ChannelState> {
        self.channels
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(label)
            .copied()
    }

    /// A channel exists but is not open yet. Observers hear about it on open.
    pub fn channel_created(&self, label: &str) {
        self.set_channel_state(label, ChannelState::Connecting);
    }

    pub fn channel_open(&self, label: &str) {
        self.set_channel_state(label, ChannelState::Open);
        for observer in self.snapshot() {
            observer.on_channel_open(label);
        }
    }

    pub fn channel_message(&self, label: &str, message: &ControlMessage) {
        for observer in self.snapshot() {
            observer.on_channel_message(label, message);
        }
    }

    pub fn channel_close(&self, label: &str) {
        self.set_channel_state(label, ChannelState::Closed);
        for observer in self.snapshot() {
            observer.on_channel_close(label);
        }
    }

    fn set_channel_state(&self, label: &str, state: ChannelState) {
        self.channels
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(label.to_owned(), state);
    }

    // Handlers run without the lock held so they may register more observers.
    fn snapshot(&self) -> Vec<Arc<dyn ConnectionObserver>> {
        self.observers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
