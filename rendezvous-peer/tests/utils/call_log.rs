use rendezvous_core::{OutboundSignal, SdpType, SignalMessage, TrackKind};
use rendezvous_peer::SourceOrigin;
use std::sync::{Arc, Mutex};

/// One observable side effect of a mock collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect,
    Sent(OutboundSignal),
    Received(SignalMessage),
    SignalingClosed,
    CreateOffer,
    CreateAnswer,
    SetLocal(SdpType),
    SetRemote(SdpType),
    Candidate(String),
    Track(TrackKind, SourceOrigin),
    DataChannel(String),
    ConnectionClosed,
}

/// Ordered record shared by the mocks of one endpoint, so tests can check
/// ordering across signaling and transport.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        tracing::debug!("[CallLog] {:?}", call);
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, wanted: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| wanted(c)).count()
    }

    pub fn position(&self, call: &Call) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    /// Candidate strings in the order they reached the connection.
    pub fn candidates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Candidate(candidate) => Some(candidate),
                _ => None,
            })
            .collect()
    }

    pub fn sent(&self) -> Vec<OutboundSignal> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Sent(signal) => Some(signal),
                _ => None,
            })
            .collect()
    }

    pub fn tracks(&self) -> Vec<(TrackKind, SourceOrigin)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Track(kind, origin) => Some((kind, origin)),
                _ => None,
            })
            .collect()
    }
}
