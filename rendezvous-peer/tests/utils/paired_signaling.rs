use crate::utils::{Call, CallLog};
use async_trait::async_trait;
use rendezvous_core::{JoinParams, OutboundSignal, Role, RoomId, SignalMessage};
use rendezvous_peer::{SignalingChannel, SignalingError};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// In-memory room shared by exactly two endpoints.
///
/// Whatever one side sends, the other receives. Closing one side delivers
/// a bye to the other.
pub struct PairedSignaling {
    role: Role,
    room: RoomId,
    log: CallLog,
    outbox: Option<mpsc::UnboundedSender<SignalMessage>>,
    inbox: mpsc::UnboundedReceiver<SignalMessage>,
}

impl PairedSignaling {
    /// Returns `(initiator, responder)`, each recording into its own log.
    pub fn pair(room: RoomId, initiator_log: CallLog, responder_log: CallLog) -> (Self, Self) {
        let (to_responder, responder_inbox) = mpsc::unbounded_channel();
        let (to_initiator, initiator_inbox) = mpsc::unbounded_channel();

        let initiator = Self {
            role: Role::Initiator,
            room: room.clone(),
            log: initiator_log,
            outbox: Some(to_responder),
            inbox: initiator_inbox,
        };
        let responder = Self {
            role: Role::Responder,
            room,
            log: responder_log,
            outbox: Some(to_initiator),
            inbox: responder_inbox,
        };
        (initiator, responder)
    }
}

#[async_trait]
impl SignalingChannel for PairedSignaling {
    async fn connect(&mut self) -> Result<JoinParams, SignalingError> {
        self.log.push(Call::Connect);
        Ok(JoinParams {
            role: self.role,
            room: self.room.clone(),
            params: HashMap::new(),
        })
    }

    async fn send(&mut self, signal: OutboundSignal) -> Result<(), SignalingError> {
        self.log.push(Call::Sent(signal.clone()));
        let outbox = self.outbox.as_ref().ok_or(SignalingError::Closed)?;
        let message = match signal {
            OutboundSignal::Description(desc) => SignalMessage::Description(desc),
            OutboundSignal::Candidate(candidate) => SignalMessage::Candidate(candidate),
        };
        outbox.send(message).map_err(|_| SignalingError::Closed)
    }

    async fn receive(&mut self) -> Result<SignalMessage, SignalingError> {
        let message = self.inbox.recv().await.unwrap_or(SignalMessage::Bye);
        self.log.push(Call::Received(message.clone()));
        Ok(message)
    }

    async fn close(&mut self) -> Result<(), SignalingError> {
        self.log.push(Call::SignalingClosed);
        if let Some(outbox) = self.outbox.take() {
            let _ = outbox.send(SignalMessage::Bye);
        }
        Ok(())
    }
}
