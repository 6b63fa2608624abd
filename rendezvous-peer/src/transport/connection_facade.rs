use crate::media::OutboundTrack;
use crate::transport::{ConnectionObserver, TransportError};
use async_trait::async_trait;
use rendezvous_core::{DataChannelConfig, IceCandidate, SessionDescription};
use std::sync::Arc;

/// The slice of a peer connection the negotiation loop drives.
///
/// ICE, DTLS, SRTP and congestion control all live behind this trait.
#[async_trait]
pub trait ConnectionFacade: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription, TransportError>;

    async fn create_answer(&self) -> Result<SessionDescription, TransportError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), TransportError>;

    /// The local description as the transport currently sees it, which may
    /// carry gathered candidates the created one did not.
    async fn local_description(&self) -> Option<SessionDescription>;

    async fn set_remote_description(&self, desc: SessionDescription)
    -> Result<(), TransportError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), TransportError>;

    async fn add_track(&self, track: OutboundTrack) -> Result<(), TransportError>;

    async fn create_data_channel(&self, config: DataChannelConfig) -> Result<(), TransportError>;

    /// Registers an observer for inbound tracks and data channel lifecycle.
    fn observe(&self, observer: Arc<dyn ConnectionObserver>);

    async fn close(&self) -> Result<(), TransportError>;
}
