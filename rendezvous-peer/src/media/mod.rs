mod camera;
mod file_playback;
mod frame_clock;
mod h264_encoder;
mod media_error;
mod media_source;
mod selector;
mod synthetic;

#[cfg(feature = "camera")]
pub use camera::DeviceCamera;
pub use camera::{CameraProbe, UnavailableCamera, default_camera};
pub use file_playback::FilePlayback;
pub use frame_clock::FrameClock;
pub(crate) use h264_encoder::EncoderWorker;
pub use h264_encoder::H264Encoder;
pub use media_error::{CameraError, MediaError};
pub use media_source::{MediaFrame, MediaPayload, MediaSource, OutboundTrack, SourceOrigin};
pub use selector::{CAMERA_PROBE_TIMEOUT, MediaSourceSelector};
pub use synthetic::{SyntheticPattern, rotate_about_center, rotation_angle};
