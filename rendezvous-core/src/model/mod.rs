mod channel;
mod media;
mod role;
mod room;
mod signaling;

pub use channel::{CONTROL_CHANNEL_LABEL, ChannelState, ControlMessage, DataChannelConfig};
pub use media::{MediaCodec, TimeBase, TrackKind};
pub use role::Role;
pub use room::{RoomId, RoomIdError};
pub use signaling::{
    IceCandidate, JoinParams, OutboundSignal, SdpType, SessionDescription, SignalMessage,
};
