use crate::media::{CameraProbe, FilePlayback, OutboundTrack, SyntheticPattern};
use std::time::Duration;
use tracing::{info, warn};

/// A camera that has not answered by then is treated as unusable.
pub const CAMERA_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Picks the outbound tracks once per session.
///
/// Priority is fixed: file playback, then a live camera, then the rotating
/// synthetic pattern. Exactly one video track comes out; audio only ever
/// comes from a file.
pub struct MediaSourceSelector {
    file: Option<FilePlayback>,
    camera: Box<dyn CameraProbe>,
    synthetic: SyntheticPattern,
}

impl MediaSourceSelector {
    pub fn new(
        file: Option<FilePlayback>,
        camera: Box<dyn CameraProbe>,
        synthetic: SyntheticPattern,
    ) -> Self {
        Self {
            file,
            camera,
            synthetic,
        }
    }

    /// Produces the tracks to attach. File sources are handed out on the
    /// first call only; later calls fall through to camera or synthetic.
    pub async fn select(&mut self) -> Vec<OutboundTrack> {
        let mut tracks = Vec::with_capacity(2);

        if let Some(file) = self.file.take() {
            let (audio, video) = file.into_sources();
            if let Some(audio) = audio {
                tracks.push(OutboundTrack::new(audio));
            }
            if let Some(video) = video {
                tracks.push(OutboundTrack::new(video));
                return tracks;
            }
        }

        match tokio::time::timeout(CAMERA_PROBE_TIMEOUT, self.camera.probe()).await {
            Ok(Ok(camera)) => {
                info!("Using camera for video");
                tracks.push(OutboundTrack::new(camera));
            }
            Ok(Err(e)) => {
                warn!("Camera unavailable ({}), sending synthetic video", e);
                tracks.push(OutboundTrack::new(Box::new(self.synthetic.clone())));
            }
            Err(_) => {
                warn!(
                    "Camera did not answer within {:?}, sending synthetic video",
                    CAMERA_PROBE_TIMEOUT
                );
                tracks.push(OutboundTrack::new(Box::new(self.synthetic.clone())));
            }
        }

        tracks
    }
}
