use crate::signaling::SignalingError;
use crate::transport::TransportError;
use rendezvous_core::SdpType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("signaling: {0}")]
    Signaling(#[from] SignalingError),

    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error("received a second remote description ({received:?} after {existing:?})")]
    DuplicateRemoteDescription { existing: SdpType, received: SdpType },

    #[error("received an answer without a local offer")]
    UnexpectedAnswer,

    #[error("{count} candidates arrived but no remote description was ever applied")]
    OrphanedCandidates { count: usize },
}
