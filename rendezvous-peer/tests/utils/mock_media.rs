use async_trait::async_trait;
use image::RgbImage;
use rendezvous_core::{MediaCodec, TrackKind};
use rendezvous_peer::{
    CameraError, CameraProbe, FilePlayback, FrameClock, MediaError, MediaFrame, MediaSource,
    MediaSourceSelector, SourceOrigin, SyntheticPattern,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source with the right identity and no frames.
pub struct SilentSource {
    kind: TrackKind,
    codec: MediaCodec,
    origin: SourceOrigin,
}

#[async_trait]
impl MediaSource for SilentSource {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn codec(&self) -> MediaCodec {
        self.codec
    }

    fn origin(&self) -> SourceOrigin {
        self.origin
    }

    async fn next_frame(
        &mut self,
        _clock: &mut FrameClock,
    ) -> Result<Option<MediaFrame>, MediaError> {
        Ok(None)
    }
}

/// File playback with whichever tracks are asked for.
pub fn file_playback(audio: bool, video: bool) -> FilePlayback {
    let source = |kind, codec| -> Box<dyn MediaSource> {
        Box::new(SilentSource {
            kind,
            codec,
            origin: SourceOrigin::FilePlayback,
        })
    };
    FilePlayback::from_sources(
        audio.then(|| source(TrackKind::Audio, MediaCodec::Opus)),
        video.then(|| source(TrackKind::Video, MediaCodec::Vp8)),
    )
}

pub fn synthetic() -> SyntheticPattern {
    SyntheticPattern::new(RgbImage::new(8, 8))
}

#[derive(Clone, Copy)]
enum CameraMode {
    Working,
    Missing,
    Denied,
    Hung,
}

/// Camera probe that counts how often it was asked.
#[derive(Clone)]
pub struct MockCamera {
    mode: CameraMode,
    probes: Arc<AtomicUsize>,
}

impl MockCamera {
    pub fn working() -> Self {
        Self::with_mode(CameraMode::Working)
    }

    pub fn missing() -> Self {
        Self::with_mode(CameraMode::Missing)
    }

    pub fn denied() -> Self {
        Self::with_mode(CameraMode::Denied)
    }

    /// Never answers, like a wedged driver.
    pub fn hung() -> Self {
        Self::with_mode(CameraMode::Hung)
    }

    fn with_mode(mode: CameraMode) -> Self {
        Self {
            mode,
            probes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CameraProbe for MockCamera {
    async fn probe(&self) -> Result<Box<dyn MediaSource>, CameraError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            CameraMode::Working => Ok(Box::new(SilentSource {
                kind: TrackKind::Video,
                codec: MediaCodec::H264,
                origin: SourceOrigin::CameraCapture,
            })),
            CameraMode::Missing => Err(CameraError::NotFound),
            CameraMode::Denied => Err(CameraError::PermissionDenied("mock".into())),
            CameraMode::Hung => std::future::pending().await,
        }
    }
}

pub fn selector(file: Option<FilePlayback>, camera: &MockCamera) -> MediaSourceSelector {
    MediaSourceSelector::new(file, Box::new(camera.clone()), synthetic())
}
