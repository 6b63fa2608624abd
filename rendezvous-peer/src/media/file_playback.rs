use crate::media::{FrameClock, MediaError, MediaFrame, MediaPayload, MediaSource, SourceOrigin};
use async_trait::async_trait;
use rendezvous_core::{MediaCodec, TimeBase, TrackKind};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, info};
use webrtc::media::io::ivf_reader::IVFReader;
use webrtc::media::io::ogg_reader::OggReader;

const OPUS_PAGE_DURATION: Duration = Duration::from_millis(20);

/// Pre-recorded media: at most one audio and one video track.
pub struct FilePlayback {
    audio: Option<Box<dyn MediaSource>>,
    video: Option<Box<dyn MediaSource>>,
}

impl FilePlayback {
    /// Opens every file and sorts it by extension: `.ivf` is VP8/VP9 video,
    /// `.ogg`/`.opus` is Opus audio.
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self, MediaError> {
        let mut playback = Self::from_sources(None, None);

        for path in paths {
            let path = path.as_ref();
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase);

            let (slot, source): (_, Box<dyn MediaSource>) = match extension.as_deref() {
                Some("ivf") => (&mut playback.video, Box::new(IvfSource::open(path)?)),
                Some("ogg") | Some("opus") => (&mut playback.audio, Box::new(OggSource::open(path)?)),
                _ => return Err(MediaError::UnsupportedContainer(path.to_path_buf())),
            };
            if slot.is_some() {
                return Err(MediaError::DuplicateKind(source.kind()));
            }
            info!("Playing {} from {}", source.kind(), path.display());
            *slot = Some(source);
        }

        Ok(playback)
    }

    pub fn from_sources(
        audio: Option<Box<dyn MediaSource>>,
        video: Option<Box<dyn MediaSource>>,
    ) -> Self {
        Self { audio, video }
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    pub(crate) fn into_sources(self) -> (Option<Box<dyn MediaSource>>, Option<Box<dyn MediaSource>>) {
        (self.audio, self.video)
    }
}

fn open_file(path: &Path) -> Result<BufReader<File>, MediaError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| MediaError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Paces a file source at the container's own frame rate.
fn ticker(period: Duration) -> Interval {
    let mut ticker = interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

struct IvfSource {
    path: PathBuf,
    reader: IVFReader<BufReader<File>>,
    codec: MediaCodec,
    time_base: TimeBase,
    frame_duration: Duration,
    ticker: Interval,
}

impl IvfSource {
    fn open(path: &Path) -> Result<Self, MediaError> {
        let (reader, header) =
            IVFReader::new(open_file(path)?).map_err(|e| MediaError::Container {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let codec = match &header.four_cc {
            b"VP80" => MediaCodec::Vp8,
            b"VP90" => MediaCodec::Vp9,
            other => {
                return Err(MediaError::UnsupportedCodec(
                    String::from_utf8_lossy(other).into_owned(),
                ));
            }
        };
        if header.timebase_denominator == 0 {
            return Err(MediaError::Container {
                path: path.to_path_buf(),
                reason: "zero time base".into(),
            });
        }

        let time_base = TimeBase::new(header.timebase_numerator, header.timebase_denominator);
        let frame_duration = Duration::from_secs_f64(time_base.seconds(1));

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            codec,
            time_base,
            frame_duration,
            ticker: ticker(frame_duration),
        })
    }
}

#[async_trait]
impl MediaSource for IvfSource {
    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    fn codec(&self) -> MediaCodec {
        self.codec
    }

    fn origin(&self) -> SourceOrigin {
        SourceOrigin::FilePlayback
    }

    async fn next_frame(
        &mut self,
        _clock: &mut FrameClock,
    ) -> Result<Option<MediaFrame>, MediaError> {
        self.ticker.tick().await;

        match self.reader.parse_next_frame() {
            Ok((frame, header)) => Ok(Some(MediaFrame {
                payload: MediaPayload::Encoded(frame.freeze()),
                pts: header.timestamp,
                time_base: self.time_base,
                duration: self.frame_duration,
            })),
            Err(e) => {
                debug!("{}: end of video ({})", self.path.display(), e);
                Ok(None)
            }
        }
    }
}

struct OggSource {
    path: PathBuf,
    reader: OggReader<BufReader<File>>,
    last_granule: u64,
    ticker: Interval,
}

impl OggSource {
    fn open(path: &Path) -> Result<Self, MediaError> {
        let (reader, _header) =
            OggReader::new(open_file(path)?, true).map_err(|e| MediaError::Container {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            last_granule: 0,
            ticker: ticker(OPUS_PAGE_DURATION),
        })
    }
}

#[async_trait]
impl MediaSource for OggSource {
    fn kind(&self) -> TrackKind {
        TrackKind::Audio
    }

    fn codec(&self) -> MediaCodec {
        MediaCodec::Opus
    }

    fn origin(&self) -> SourceOrigin {
        SourceOrigin::FilePlayback
    }

    async fn next_frame(
        &mut self,
        _clock: &mut FrameClock,
    ) -> Result<Option<MediaFrame>, MediaError> {
        self.ticker.tick().await;

        match self.reader.parse_next_page() {
            Ok((page, header)) => {
                // Granule positions count 48 kHz samples from stream start.
                let samples = header.granule_position.saturating_sub(self.last_granule);
                let pts = self.last_granule;
                self.last_granule = header.granule_position;

                Ok(Some(MediaFrame {
                    payload: MediaPayload::Encoded(page.freeze()),
                    pts,
                    time_base: TimeBase::AUDIO,
                    duration: Duration::from_millis(samples * 1000 / 48_000),
                }))
            }
            Err(e) => {
                debug!("{}: end of audio ({})", self.path.display(), e);
                Ok(None)
            }
        }
    }
}
