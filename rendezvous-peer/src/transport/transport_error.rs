use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("webrtc: {0}")]
    WebRtc(#[from] webrtc::Error),

    #[error("unsupported session description type {0}")]
    UnsupportedDescription(String),

    #[error("connection is closed")]
    Closed,
}
