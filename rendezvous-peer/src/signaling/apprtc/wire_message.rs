use crate::signaling::SignalingError;
use rendezvous_core::{
    IceCandidate, OutboundSignal, Role, RoomId, SessionDescription, SignalMessage,
};
use serde::{Deserialize, Serialize};

const CANDIDATE_PREFIX: &str = "candidate:";

/// Peer-to-peer payload relayed verbatim by the room server.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum WireMessage {
    Offer {
        sdp: String,
    },
    Answer {
        sdp: String,
    },
    Candidate {
        candidate: String,
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        label: Option<u16>,
    },
    Bye,
}

impl From<OutboundSignal> for WireMessage {
    fn from(signal: OutboundSignal) -> Self {
        match signal {
            OutboundSignal::Description(desc) => match desc.kind {
                rendezvous_core::SdpType::Offer => Self::Offer { sdp: desc.sdp },
                rendezvous_core::SdpType::Answer => Self::Answer { sdp: desc.sdp },
            },
            OutboundSignal::Candidate(c) => {
                let candidate = if c.candidate.starts_with(CANDIDATE_PREFIX) {
                    c.candidate
                } else {
                    format!("{CANDIDATE_PREFIX}{}", c.candidate)
                };
                Self::Candidate {
                    candidate,
                    id: c.sdp_mid,
                    label: c.sdp_m_line_index,
                }
            }
        }
    }
}

impl From<WireMessage> for SignalMessage {
    fn from(msg: WireMessage) -> Self {
        match msg {
            WireMessage::Offer { sdp } => Self::Description(SessionDescription::offer(sdp)),
            WireMessage::Answer { sdp } => Self::Description(SessionDescription::answer(sdp)),
            WireMessage::Candidate {
                candidate,
                id,
                label,
            } => Self::Candidate(IceCandidate {
                candidate,
                sdp_mid: id,
                sdp_m_line_index: label,
            }),
            WireMessage::Bye => Self::Bye,
        }
    }
}

/// Text frame pushed by the websocket collider.
#[derive(Debug, Deserialize)]
pub(crate) struct ColliderFrame {
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JoinResponse {
    pub result: String,
    #[serde(default)]
    pub params: Option<JoinResponseParams>,
}

/// Refusals come back with little more than an empty `messages` list, so
/// nothing here is required until the result says `SUCCESS`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct JoinResponseParams {
    #[serde(default)]
    pub is_initiator: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub wss_url: Option<String>,
    #[serde(default)]
    pub room_link: Option<String>,
    /// Messages the other peer posted before we joined, oldest first.
    #[serde(default)]
    pub messages: Vec<String>,
}

/// A join the room server accepted.
#[derive(Debug)]
pub(crate) struct AcceptedJoin {
    pub role: Role,
    pub room_id: String,
    pub client_id: String,
    pub wss_url: String,
    pub room_link: Option<String>,
    pub messages: Vec<String>,
}

impl JoinResponse {
    /// Checks the result first, then the fields a successful join must carry.
    pub(crate) fn accept(self, room: &RoomId) -> Result<AcceptedJoin, SignalingError> {
        match self.result.as_str() {
            "SUCCESS" => {}
            "FULL" => return Err(SignalingError::RoomFull(room.to_string())),
            other => return Err(SignalingError::JoinRejected(other.to_owned())),
        }

        let params = self.params.unwrap_or_default();
        let role = match required(params.is_initiator, "is_initiator")?.as_str() {
            "true" => Role::Initiator,
            _ => Role::Responder,
        };

        Ok(AcceptedJoin {
            role,
            room_id: required(params.room_id, "room_id")?,
            client_id: required(params.client_id, "client_id")?,
            wss_url: required(params.wss_url, "wss_url")?,
            room_link: params.room_link,
            messages: params.messages,
        })
    }
}

fn required(field: Option<String>, name: &str) -> Result<String, SignalingError> {
    field.ok_or_else(|| SignalingError::Malformed(format!("join response without {name}")))
}

pub(crate) fn encode(signal: OutboundSignal) -> Result<String, SignalingError> {
    Ok(serde_json::to_string(&WireMessage::from(signal))?)
}

pub(crate) fn encode_bye() -> Result<String, SignalingError> {
    Ok(serde_json::to_string(&WireMessage::Bye)?)
}

pub(crate) fn decode(raw: &str) -> Result<SignalMessage, SignalingError> {
    let msg: WireMessage = serde_json::from_str(raw)?;
    Ok(msg.into())
}
