mod apprtc;
mod signaling_channel;
mod signaling_error;

pub use apprtc::{ApprtcConfig, ApprtcSignaling};
pub use signaling_channel::SignalingChannel;
pub use signaling_error::SignalingError;
