use crate::signaling::SignalingError;
use async_trait::async_trait;
use rendezvous_core::{JoinParams, OutboundSignal, SignalMessage};

/// Rendezvous service used to swap descriptions and candidates with the
/// remote peer before a direct transport exists.
#[async_trait]
pub trait SignalingChannel: Send {
    /// Join the room. The returned role is final for the whole session.
    async fn connect(&mut self) -> Result<JoinParams, SignalingError>;

    async fn send(&mut self, signal: OutboundSignal) -> Result<(), SignalingError>;

    /// Suspends until the next message arrives or the remote peer leaves.
    async fn receive(&mut self) -> Result<SignalMessage, SignalingError>;

    /// Idempotent, best-effort.
    async fn close(&mut self) -> Result<(), SignalingError>;
}
