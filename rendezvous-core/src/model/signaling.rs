use crate::model::role::Role;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
}

/// A tagged, otherwise opaque session description.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpType,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpType::Answer,
            sdp: sdp.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct IceCandidate {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u16>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_m_line_index: None,
        }
    }
}

/// Everything the signaling service can hand to the negotiation loop.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SignalMessage {
    Description(SessionDescription),
    Candidate(IceCandidate),
    /// The remote peer left the room.
    Bye,
}

/// Everything the negotiation loop may push to the signaling service.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OutboundSignal {
    Description(SessionDescription),
    Candidate(IceCandidate),
}

impl From<SessionDescription> for OutboundSignal {
    fn from(desc: SessionDescription) -> Self {
        Self::Description(desc)
    }
}

impl From<IceCandidate> for OutboundSignal {
    fn from(candidate: IceCandidate) -> Self {
        Self::Candidate(candidate)
    }
}

/// Result of joining a room.
#[derive(Debug, Clone)]
pub struct JoinParams {
    pub role: Role,
    pub room: RoomId,
    /// Service specific values (client id, room link, ...).
    pub params: HashMap<String, String>,
}
