use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("signaling service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("signaling websocket failed: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("invalid signaling url: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed signaling message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed signaling message: {0}")]
    Malformed(String),

    #[error("room {0} is full")]
    RoomFull(String),

    #[error("room server rejected join: {0}")]
    JoinRejected(String),

    #[error("signaling service reported: {0}")]
    Service(String),

    #[error("signaling channel is not connected")]
    NotConnected,

    #[error("signaling channel is closed")]
    Closed,
}
