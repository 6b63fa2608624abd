use crate::media::{EncoderWorker, FrameClock, MediaPayload, OutboundTrack};
use std::sync::Arc;
use tracing::{debug, info, warn};
use webrtc::media::Sample;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Feeds one outbound track until its source runs dry or a write fails.
pub(crate) async fn pump(mut track: OutboundTrack, local: Arc<TrackLocalStaticSample>) {
    let kind = track.kind;
    let mut clock = FrameClock::for_kind(kind);
    let mut encoder: Option<EncoderWorker> = None;
    let mut sent = 0u64;

    loop {
        let frame = match track.source.next_frame(&mut clock).await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("{} source finished after {} frames", kind, sent);
                break;
            }
            Err(e) => {
                warn!("{} source failed: {}", kind, e);
                break;
            }
        };

        let data = match frame.payload {
            MediaPayload::Encoded(data) => data,
            MediaPayload::Raw(picture) => {
                if encoder.is_none() {
                    match EncoderWorker::spawn(&kind.to_string()) {
                        Ok(worker) => encoder = Some(worker),
                        Err(e) => {
                            warn!("Cannot start {} encoder: {}", kind, e);
                            break;
                        }
                    }
                }
                let Some(worker) = encoder.as_mut() else { break };
                match worker.encode(picture).await {
                    Ok(data) => data,
                    Err(e) => {
                        warn!("{} encoding failed: {}", kind, e);
                        break;
                    }
                }
            }
        };

        let sample = Sample {
            data,
            duration: frame.duration,
            ..Default::default()
        };
        if let Err(e) = local.write_sample(&sample).await {
            warn!("Writing {} sample failed: {}", kind, e);
            break;
        }
        sent += 1;
    }

    debug!("{} pump stopped", kind);
}
