use rendezvous_core::TrackKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported media file {0}")]
    UnsupportedContainer(PathBuf),

    #[error("unsupported codec {0:?}")]
    UnsupportedCodec(String),

    #[error("more than one {0} file configured")]
    DuplicateKind(TrackKind),

    #[error("malformed container {path}: {reason}")]
    Container { path: PathBuf, reason: String },

    #[error("image: {0}")]
    Image(#[from] image::ImageError),

    #[error("encoder: {0}")]
    Encoder(String),

    #[error("media worker stopped: {0}")]
    Worker(String),
}

/// Why a camera could not be acquired. Never fatal to a session.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera support is not compiled in")]
    Unsupported,

    #[error("no camera device found")]
    NotFound,

    #[error("camera access denied: {0}")]
    PermissionDenied(String),

    #[error("camera driver error: {0}")]
    Driver(String),
}
