use crate::media::OutboundTrack;
use crate::transport::track_pump::pump;
use crate::transport::{
    ConnectionFacade, ConnectionObserver, ObserverSet, TransportConfig, TransportError,
};
use async_trait::async_trait;
use rendezvous_core::{
    ControlMessage, DataChannelConfig, IceCandidate, MediaCodec, SdpType, SessionDescription,
    TrackKind,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

const H264_FMTP: &str = "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42001f";
const OPUS_FMTP: &str = "minptime=10;useinbandfec=1";
const GATHERING_TIMEOUT: Duration = Duration::from_secs(10);
const STREAM_ID: &str = "rendezvous";

/// [`ConnectionFacade`] over a webrtc-rs peer connection.
///
/// Outbound tracks are pumped only once the connection reports `Connected`;
/// until then their tasks sit idle.
pub struct RtcConnection {
    peer_connection: Arc<RTCPeerConnection>,
    observers: ObserverSet,
    connected: watch::Receiver<bool>,
    pumps: Mutex<Vec<JoinHandle<()>>>,
}

impl RtcConnection {
    pub async fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: vec![RTCIceServer {
                urls: config.ice_servers,
                ..Default::default()
            }],
            ..Default::default()
        };
        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let observers = ObserverSet::new();
        let (connected_tx, connected) = watch::channel(false);

        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                info!("Connection state is {}", s);
                if s == RTCPeerConnectionState::Connected {
                    connected_tx.send_replace(true);
                }
                Box::pin(async {})
            },
        ));

        let track_observers = observers.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let observers = track_observers.clone();
                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Audio => TrackKind::Audio,
                        RTPCodecType::Video => TrackKind::Video,
                        other => {
                            debug!("Ignoring remote track of kind {}", other);
                            return;
                        }
                    };
                    observers.track(kind);

                    // Inbound media is not rendered; drain it so the receiver keeps flowing.
                    tokio::spawn(async move {
                        while track.read_rtp().await.is_ok() {}
                        debug!("Remote {} track ended", kind);
                    });
                })
            },
        ));

        let channel_observers = observers.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let observers = channel_observers.clone();
            Box::pin(async move {
                debug!("Remote opened data channel '{}'", dc.label());
                wire_channel(&dc, observers);
            })
        }));

        Ok(Self {
            peer_connection,
            observers,
            connected,
            pumps: Mutex::new(Vec::new()),
        })
    }

    fn pumps(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pumps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn wire_channel(dc: &Arc<RTCDataChannel>, observers: ObserverSet) {
    let label = dc.label().to_owned();
    observers.channel_created(&label);

    let (open_label, open_observers) = (label.clone(), observers.clone());
    dc.on_open(Box::new(move || {
        open_observers.channel_open(&open_label);
        Box::pin(async {})
    }));

    let (message_label, message_observers) = (label.clone(), observers.clone());
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let message = ControlMessage::classify(msg.is_string, msg.data);
        message_observers.channel_message(&message_label, &message);
        Box::pin(async {})
    }));

    dc.on_close(Box::new(move || {
        observers.channel_close(&label);
        Box::pin(async {})
    }));
}

fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription, TransportError> {
    let desc = match desc.kind {
        SdpType::Offer => RTCSessionDescription::offer(desc.sdp)?,
        SdpType::Answer => RTCSessionDescription::answer(desc.sdp)?,
    };
    Ok(desc)
}

fn from_rtc(desc: RTCSessionDescription) -> Result<SessionDescription, TransportError> {
    match desc.sdp_type {
        RTCSdpType::Offer => Ok(SessionDescription::offer(desc.sdp)),
        RTCSdpType::Answer => Ok(SessionDescription::answer(desc.sdp)),
        other => Err(TransportError::UnsupportedDescription(other.to_string())),
    }
}

fn capability(codec: MediaCodec) -> RTCRtpCodecCapability {
    let sdp_fmtp_line = match codec {
        MediaCodec::H264 => H264_FMTP,
        MediaCodec::Opus => OPUS_FMTP,
        MediaCodec::Vp8 | MediaCodec::Vp9 => "",
    };
    RTCRtpCodecCapability {
        mime_type: codec.mime_type().to_owned(),
        clock_rate: codec.clock_rate(),
        channels: codec.channels(),
        sdp_fmtp_line: sdp_fmtp_line.to_owned(),
        ..Default::default()
    }
}

#[async_trait]
impl ConnectionFacade for RtcConnection {
    async fn create_offer(&self) -> Result<SessionDescription, TransportError> {
        let offer = self.peer_connection.create_offer(None).await?;
        from_rtc(offer)
    }

    async fn create_answer(&self) -> Result<SessionDescription, TransportError> {
        let answer = self.peer_connection.create_answer(None).await?;
        from_rtc(answer)
    }

    /// Applies the description and waits for ICE gathering, so the
    /// description read back afterwards carries every local candidate.
    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), TransportError> {
        let mut gathered = self.peer_connection.gathering_complete_promise().await;
        self.peer_connection
            .set_local_description(to_rtc(desc)?)
            .await?;

        if tokio::time::timeout(GATHERING_TIMEOUT, gathered.recv())
            .await
            .is_err()
        {
            warn!("ICE gathering still running after {:?}", GATHERING_TIMEOUT);
        }
        Ok(())
    }

    async fn local_description(&self) -> Option<SessionDescription> {
        let desc = self.peer_connection.local_description().await?;
        from_rtc(desc).ok()
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), TransportError> {
        self.peer_connection
            .set_remote_description(to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), TransportError> {
        self.peer_connection
            .add_ice_candidate(RTCIceCandidateInit {
                candidate: candidate.candidate,
                sdp_mid: candidate.sdp_mid,
                sdp_mline_index: candidate.sdp_m_line_index,
                username_fragment: None,
            })
            .await?;
        Ok(())
    }

    async fn add_track(&self, track: OutboundTrack) -> Result<(), TransportError> {
        let kind = track.kind;
        let local = Arc::new(TrackLocalStaticSample::new(
            capability(track.codec()),
            kind.to_string(),
            STREAM_ID.to_owned(),
        ));

        let sender = self
            .peer_connection
            .add_track(Arc::clone(&local) as Arc<dyn TrackLocal + Send + Sync>)
            .await?;
        info!("Sending {} from {:?}", kind, track.origin);

        // RTCP has to be read for the interceptors to process it.
        let rtcp = tokio::spawn(async move {
            let mut buf = vec![0u8; 1500];
            while sender.read(&mut buf).await.is_ok() {}
        });

        let mut connected = self.connected.clone();
        let media = tokio::spawn(async move {
            if connected.wait_for(|up| *up).await.is_err() {
                return;
            }
            pump(track, local).await;
        });

        self.pumps().extend([rtcp, media]);
        Ok(())
    }

    async fn create_data_channel(&self, config: DataChannelConfig) -> Result<(), TransportError> {
        let init = RTCDataChannelInit {
            ordered: Some(config.ordered),
            max_retransmits: config.max_retransmits,
            ..Default::default()
        };
        let dc = self
            .peer_connection
            .create_data_channel(&config.label, Some(init))
            .await?;
        wire_channel(&dc, self.observers.clone());
        Ok(())
    }

    fn observe(&self, observer: Arc<dyn ConnectionObserver>) {
        self.observers.add(observer);
    }

    async fn close(&self) -> Result<(), TransportError> {
        for task in self.pumps().drain(..) {
            task.abort();
        }
        self.peer_connection.close().await?;
        Ok(())
    }
}
