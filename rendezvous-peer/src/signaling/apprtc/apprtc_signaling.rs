use crate::signaling::apprtc::ApprtcConfig;
use crate::signaling::apprtc::wire_message::{self, ColliderFrame, JoinResponse};
use crate::signaling::{SignalingChannel, SignalingError};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use rendezvous_core::{JoinParams, OutboundSignal, Role, RoomId, SignalMessage};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::error::{Error as WsError, ProtocolError};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use url::Url;

type Collider = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// State that only exists once the room has been joined.
struct Joined {
    role: Role,
    room_id: String,
    client_id: String,
    pending: VecDeque<String>,
    /// `None` until the collider accepted our registration.
    collider: Option<Collider>,
}

impl Joined {
    fn collider(&mut self) -> Result<&mut Collider, SignalingError> {
        self.collider.as_mut().ok_or(SignalingError::NotConnected)
    }
}

/// Signaling through an AppRTC room server.
///
/// The initiator posts its messages over HTTP so the server can store them
/// until the responder shows up; the responder talks over the collider
/// websocket. Everything inbound arrives on the websocket, after whatever
/// the join response had queued.
pub struct ApprtcSignaling {
    config: ApprtcConfig,
    room: RoomId,
    http: reqwest::Client,
    joined: Option<Joined>,
}

impl ApprtcSignaling {
    pub fn new(room: RoomId, config: ApprtcConfig) -> Self {
        Self {
            config,
            room,
            http: reqwest::Client::new(),
            joined: None,
        }
    }

    async fn join(&self) -> Result<JoinResponse, SignalingError> {
        let url = self.config.join_url(self.room.as_str());
        debug!("POST {}", url);

        // The room server does not always label its JSON, so parse the text.
        let body = self
            .http
            .post(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn open_collider(&self, wss_url: &str) -> Result<Collider, SignalingError> {
        let url = Url::parse(wss_url)?;
        let mut request = url.as_str().into_client_request()?;
        let origin = HeaderValue::from_str(&self.config.origin)
            .map_err(|e| SignalingError::Malformed(e.to_string()))?;
        request.headers_mut().insert("Origin", origin);

        let (collider, _) = connect_async(request).await?;
        Ok(collider)
    }

    async fn deliver(&mut self, message: String) -> Result<(), SignalingError> {
        let joined = self.joined.as_mut().ok_or(SignalingError::NotConnected)?;
        debug!("> {}", message);

        match joined.role {
            Role::Initiator => {
                let url = self
                    .config
                    .message_url(&joined.room_id, &joined.client_id);
                self.http
                    .post(&url)
                    .body(message)
                    .send()
                    .await?
                    .error_for_status()?;
            }
            Role::Responder => {
                let frame = json!({"cmd": "send", "msg": message}).to_string();
                joined.collider()?.send(Message::Text(frame)).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SignalingChannel for ApprtcSignaling {
    async fn connect(&mut self) -> Result<JoinParams, SignalingError> {
        let accepted = self.join().await?.accept(&self.room)?;
        let role = accepted.role;

        let link = accepted.room_link.unwrap_or_default();
        info!("AppRTC room is {} {}", accepted.room_id, link);

        let mut extra = HashMap::new();
        extra.insert("client_id".to_owned(), accepted.client_id.clone());
        extra.insert("room_link".to_owned(), link);
        extra.insert("wss_url".to_owned(), accepted.wss_url.clone());

        let register = json!({
            "cmd": "register",
            "roomid": accepted.room_id,
            "clientid": accepted.client_id,
        });

        // The server now holds a slot for us; `close` must be able to give it back.
        self.joined = Some(Joined {
            role,
            room_id: accepted.room_id,
            client_id: accepted.client_id,
            pending: accepted.messages.into(),
            collider: None,
        });

        let mut collider = self.open_collider(&accepted.wss_url).await?;
        collider.send(Message::Text(register.to_string())).await?;
        if let Some(joined) = self.joined.as_mut() {
            joined.collider = Some(collider);
        }

        Ok(JoinParams {
            role,
            room: self.room.clone(),
            params: extra,
        })
    }

    async fn send(&mut self, signal: OutboundSignal) -> Result<(), SignalingError> {
        let message = wire_message::encode(signal)?;
        self.deliver(message).await
    }

    async fn receive(&mut self) -> Result<SignalMessage, SignalingError> {
        let joined = self.joined.as_mut().ok_or(SignalingError::NotConnected)?;

        if let Some(raw) = joined.pending.pop_front() {
            debug!("< {}", raw);
            return wire_message::decode(&raw);
        }

        let collider = joined.collider()?;
        loop {
            let frame = match collider.next().await {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(_))) | None => {
                    info!("Collider closed the websocket");
                    return Ok(SignalMessage::Bye);
                }
                Some(Err(WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake)))
                | Some(Err(WsError::ConnectionClosed)) => {
                    info!("Collider dropped the connection");
                    return Ok(SignalMessage::Bye);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            };

            let frame: ColliderFrame = serde_json::from_str(&frame)?;
            if !frame.error.is_empty() {
                return Err(SignalingError::Service(frame.error));
            }
            if frame.msg.is_empty() {
                continue;
            }
            debug!("< {}", frame.msg);
            return wire_message::decode(&frame.msg);
        }
    }

    async fn close(&mut self) -> Result<(), SignalingError> {
        // A responder that never reached the collider has nobody to say bye to.
        let reachable = match &self.joined {
            None => return Ok(()),
            Some(joined) => joined.role == Role::Initiator || joined.collider.is_some(),
        };

        let mut first_error = None;

        if reachable {
            match wire_message::encode_bye() {
                Ok(bye) => {
                    if let Err(e) = self.deliver(bye).await {
                        warn!("Failed to send bye: {}", e);
                        first_error.get_or_insert(e);
                    }
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        let Some(joined) = self.joined.take() else {
            return Ok(());
        };

        let leave = self.config.leave_url(&joined.room_id, &joined.client_id);
        let left = match self.http.post(&leave).send().await {
            Ok(response) => response.error_for_status().map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = left {
            warn!("Failed to leave room {}: {}", joined.room_id, e);
            first_error.get_or_insert(e.into());
        }

        if let Some(mut collider) = joined.collider {
            if let Err(e) = collider.close(None).await {
                warn!("Failed to close collider websocket: {}", e);
                first_error.get_or_insert(e.into());
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
