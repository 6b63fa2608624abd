use crate::media::{FrameClock, MediaError};
use async_trait::async_trait;
use bytes::Bytes;
use image::RgbImage;
use rendezvous_core::{MediaCodec, TimeBase, TrackKind};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceOrigin {
    FilePlayback,
    CameraCapture,
    SyntheticPattern,
}

#[derive(Debug, Clone)]
pub enum MediaPayload {
    /// Already in the track's codec, written to the wire as is.
    Encoded(Bytes),
    /// Decoded picture, encoded by the transport before sending.
    Raw(RgbImage),
}

#[derive(Debug, Clone)]
pub struct MediaFrame {
    pub payload: MediaPayload,
    pub pts: u64,
    pub time_base: TimeBase,
    pub duration: Duration,
}

/// Produces the frames of one outbound track.
#[async_trait]
pub trait MediaSource: Send {
    fn kind(&self) -> TrackKind;

    fn codec(&self) -> MediaCodec;

    fn origin(&self) -> SourceOrigin;

    /// Next frame, or `None` once the source is exhausted. Live sources take
    /// their timestamps from `clock`, which also paces them.
    async fn next_frame(&mut self, clock: &mut FrameClock)
    -> Result<Option<MediaFrame>, MediaError>;
}

/// A source picked for sending, ready to hand to the transport.
pub struct OutboundTrack {
    pub kind: TrackKind,
    pub origin: SourceOrigin,
    pub source: Box<dyn MediaSource>,
}

impl OutboundTrack {
    pub fn new(source: Box<dyn MediaSource>) -> Self {
        Self {
            kind: source.kind(),
            origin: source.origin(),
            source,
        }
    }

    pub fn codec(&self) -> MediaCodec {
        self.source.codec()
    }
}

impl fmt::Debug for OutboundTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundTrack")
            .field("kind", &self.kind)
            .field("origin", &self.origin)
            .field("codec", &self.codec())
            .finish()
    }
}
