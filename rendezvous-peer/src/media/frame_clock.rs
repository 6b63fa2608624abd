use rendezvous_core::{TimeBase, TrackKind};
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

const VIDEO_FPS: u64 = 30;
const AUDIO_PTIME: Duration = Duration::from_millis(20);

/// Fixed frame-timing contract handed to live sources.
///
/// Timestamps start at zero and grow by a constant number of ticks per
/// frame. Each call after the first waits until the frame is due relative
/// to the first call, so late frames catch up instead of drifting.
#[derive(Debug, Clone)]
pub struct FrameClock {
    time_base: TimeBase,
    ticks_per_frame: u64,
    start: Option<Instant>,
    pts: u64,
}

impl FrameClock {
    pub fn new(time_base: TimeBase, ticks_per_frame: u64) -> Self {
        Self {
            time_base,
            ticks_per_frame,
            start: None,
            pts: 0,
        }
    }

    /// 90 kHz, 30 frames per second.
    pub fn video() -> Self {
        let time_base = TimeBase::VIDEO;
        Self::new(time_base, time_base.den as u64 / (time_base.num as u64 * VIDEO_FPS))
    }

    /// 48 kHz, 20 ms packets.
    pub fn audio() -> Self {
        let time_base = TimeBase::AUDIO;
        Self::new(time_base, time_base.ticks(AUDIO_PTIME))
    }

    pub fn for_kind(kind: TrackKind) -> Self {
        match kind {
            TrackKind::Audio => Self::audio(),
            TrackKind::Video => Self::video(),
        }
    }

    pub fn time_base(&self) -> TimeBase {
        self.time_base
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(self.time_base.seconds(self.ticks_per_frame))
    }

    pub async fn next_timestamp(&mut self) -> (u64, TimeBase) {
        match self.start {
            None => {
                self.start = Some(Instant::now());
                self.pts = 0;
            }
            Some(start) => {
                self.pts += self.ticks_per_frame;
                let due = start + Duration::from_secs_f64(self.time_base.seconds(self.pts));
                sleep_until(due).await;
            }
        }
        (self.pts, self.time_base)
    }
}
