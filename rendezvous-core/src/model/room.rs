use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of generated room identifiers.
const GENERATED_LEN: usize = 10;

/// Shortest identifier the room server accepts.
const MIN_LEN: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomIdError {
    #[error("room id must be at least {MIN_LEN} characters, got {0}")]
    TooShort(usize),

    #[error("room id contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Opaque rendezvous key shared out of band by both peers.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct RoomId(String);

impl RoomId {
    /// Generates a numeric room id from the given randomness source.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..GENERATED_LEN)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(id)
    }

    /// Validates a user supplied id: `[A-Za-z0-9_-]`, five characters or more.
    pub fn parse(s: &str) -> Result<Self, RoomIdError> {
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(RoomIdError::InvalidChar(bad));
        }
        if s.len() < MIN_LEN {
            return Err(RoomIdError::TooShort(s.len()));
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
