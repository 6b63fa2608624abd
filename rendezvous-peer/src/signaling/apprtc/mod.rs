mod apprtc_config;
mod apprtc_signaling;
mod wire_message;

pub use apprtc_config::ApprtcConfig;
pub use apprtc_signaling::ApprtcSignaling;
