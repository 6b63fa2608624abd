use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const CONTROL_CHANNEL_LABEL: &str = "control";

/// Creation parameters of a data channel. Fixed once the channel exists.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct DataChannelConfig {
    pub label: String,
    pub ordered: bool,
    /// `None` means fully reliable.
    pub max_retransmits: Option<u16>,
}

impl DataChannelConfig {
    /// Unordered, zero-retransmit channel for transient control notices.
    pub fn control() -> Self {
        Self {
            label: CONTROL_CHANNEL_LABEL.to_owned(),
            ordered: false,
            max_retransmits: Some(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

/// A message received on the control channel.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ControlMessage {
    Text(String),
    Binary(Bytes),
}

impl ControlMessage {
    /// Classifies a raw payload. Strings that are not valid UTF-8 stay binary.
    pub fn classify(is_string: bool, data: Bytes) -> Self {
        if !is_string {
            return Self::Binary(data);
        }
        match String::from_utf8(data.to_vec()) {
            Ok(text) => Self::Text(text),
            Err(_) => Self::Binary(data),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}
