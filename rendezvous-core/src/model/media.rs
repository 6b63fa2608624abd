use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => f.write_str("audio"),
            Self::Video => f.write_str("video"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum MediaCodec {
    Vp8,
    Vp9,
    H264,
    Opus,
}

impl MediaCodec {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Vp8 => "video/VP8",
            Self::Vp9 => "video/VP9",
            Self::H264 => "video/H264",
            Self::Opus => "audio/opus",
        }
    }

    pub fn clock_rate(self) -> u32 {
        match self {
            Self::Opus => 48_000,
            _ => 90_000,
        }
    }

    pub fn channels(self) -> u16 {
        match self {
            Self::Opus => 2,
            _ => 0,
        }
    }
}

/// Seconds per timestamp tick, as the rational `num / den`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct TimeBase {
    pub num: u32,
    pub den: u32,
}

impl TimeBase {
    pub const VIDEO: TimeBase = TimeBase::new(1, 90_000);
    pub const AUDIO: TimeBase = TimeBase::new(1, 48_000);

    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Converts a timestamp in this time base to seconds.
    pub fn seconds(self, pts: u64) -> f64 {
        pts as f64 * self.num as f64 / self.den as f64
    }

    /// Number of ticks covering `duration`, rounded down.
    pub fn ticks(self, duration: Duration) -> u64 {
        (duration.as_nanos() * self.den as u128 / (self.num as u128 * 1_000_000_000)) as u64
    }
}
