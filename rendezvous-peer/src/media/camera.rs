use crate::media::{CameraError, MediaSource};
use async_trait::async_trait;

/// Capability probe for a live camera.
///
/// Probing either hands back a running capture source or says why no camera
/// is usable; callers decide what to fall back to.
#[async_trait]
pub trait CameraProbe: Send + Sync {
    async fn probe(&self) -> Result<Box<dyn MediaSource>, CameraError>;
}

/// Stand-in used when the crate is built without camera support.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableCamera;

#[async_trait]
impl CameraProbe for UnavailableCamera {
    async fn probe(&self) -> Result<Box<dyn MediaSource>, CameraError> {
        Err(CameraError::Unsupported)
    }
}

/// First camera of the platform when the `camera` feature is enabled.
pub fn default_camera() -> Box<dyn CameraProbe> {
    #[cfg(feature = "camera")]
    {
        Box::new(DeviceCamera::new(0))
    }
    #[cfg(not(feature = "camera"))]
    {
        Box::new(UnavailableCamera)
    }
}

#[cfg(feature = "camera")]
pub use device::DeviceCamera;

#[cfg(feature = "camera")]
mod device {
    use crate::media::synthetic::even_dimensions;
    use crate::media::{
        CameraError, CameraProbe, FrameClock, MediaError, MediaFrame, MediaPayload, MediaSource,
        SourceOrigin,
    };
    use async_trait::async_trait;
    use image::RgbImage;
    use nokhwa::Camera;
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
    use rendezvous_core::{MediaCodec, TrackKind};
    use std::thread;
    use tokio::sync::{mpsc, oneshot};
    use tracing::{debug, warn};

    /// Camera backed by `nokhwa`.
    ///
    /// The device handle is not `Send` on every platform, so it lives on a
    /// dedicated capture thread for its whole life.
    #[derive(Debug, Clone)]
    pub struct DeviceCamera {
        index: u32,
    }

    impl DeviceCamera {
        pub fn new(index: u32) -> Self {
            Self { index }
        }
    }

    #[async_trait]
    impl CameraProbe for DeviceCamera {
        async fn probe(&self) -> Result<Box<dyn MediaSource>, CameraError> {
            let (ready_tx, ready_rx) = oneshot::channel();
            let (frame_tx, frame_rx) = mpsc::channel(2);
            let index = self.index;

            thread::Builder::new()
                .name("camera-capture".into())
                .spawn(move || capture_loop(index, ready_tx, frame_tx))
                .map_err(|e| CameraError::Driver(e.to_string()))?;

            match ready_rx.await {
                Ok(Ok(())) => Ok(Box::new(CameraCapture { frames: frame_rx })),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(CameraError::Driver("capture thread exited".into())),
            }
        }
    }

    fn classify(error: nokhwa::NokhwaError) -> CameraError {
        let text = error.to_string();
        let lower = text.to_lowercase();
        if lower.contains("permission") || lower.contains("denied") {
            CameraError::PermissionDenied(text)
        } else if lower.contains("not found") || lower.contains("no device") {
            CameraError::NotFound
        } else {
            CameraError::Driver(text)
        }
    }

    fn capture_loop(
        index: u32,
        ready: oneshot::Sender<Result<(), CameraError>>,
        frames: mpsc::Sender<RgbImage>,
    ) {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = match Camera::new(CameraIndex::Index(index), requested) {
            Ok(camera) => camera,
            Err(e) => {
                let _ = ready.send(Err(classify(e)));
                return;
            }
        };
        if let Err(e) = camera.open_stream() {
            let _ = ready.send(Err(classify(e)));
            return;
        }
        let _ = ready.send(Ok(()));

        loop {
            let decoded = match camera
                .frame()
                .and_then(|buffer| buffer.decode_image::<RgbFormat>())
            {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!("Camera capture failed: {}", e);
                    break;
                }
            };
            let (width, height) = (decoded.width(), decoded.height());
            let Some(image) = RgbImage::from_raw(width, height, decoded.into_raw()) else {
                warn!("Camera produced a truncated {}x{} frame", width, height);
                break;
            };
            if frames.blocking_send(even_dimensions(image)).is_err() {
                debug!("Camera source dropped, stopping capture");
                break;
            }
        }

        let _ = camera.stop_stream();
    }

    struct CameraCapture {
        frames: mpsc::Receiver<RgbImage>,
    }

    #[async_trait]
    impl MediaSource for CameraCapture {
        fn kind(&self) -> TrackKind {
            TrackKind::Video
        }

        fn codec(&self) -> MediaCodec {
            MediaCodec::H264
        }

        fn origin(&self) -> SourceOrigin {
            SourceOrigin::CameraCapture
        }

        async fn next_frame(
            &mut self,
            clock: &mut FrameClock,
        ) -> Result<Option<MediaFrame>, MediaError> {
            let (pts, time_base) = clock.next_timestamp().await;

            let Some(mut image) = self.frames.recv().await else {
                return Ok(None);
            };
            // Keep only the freshest picture if capture ran ahead.
            while let Ok(newer) = self.frames.try_recv() {
                image = newer;
            }

            Ok(Some(MediaFrame {
                payload: MediaPayload::Raw(image),
                pts,
                time_base,
                duration: clock.frame_duration(),
            }))
        }
    }
}
