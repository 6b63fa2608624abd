use crate::media::MediaSourceSelector;
use crate::negotiation::{NegotiationError, NegotiationState};
use crate::signaling::SignalingChannel;
use crate::transport::ConnectionFacade;
use rendezvous_core::{IceCandidate, Role, SdpType, SessionDescription, SignalMessage};
use tracing::{debug, info};

/// Drives one offer/answer exchange from room join to `Bye`.
///
/// The loop borrows its collaborators; closing them is the caller's job.
pub struct NegotiationLoop<'a> {
    signaling: &'a mut dyn SignalingChannel,
    connection: &'a dyn ConnectionFacade,
    selector: &'a mut MediaSourceSelector,
    state: NegotiationState,
    history: Vec<NegotiationState>,
    role: Option<Role>,
    remote: Option<SdpType>,
    offer_pending: bool,
    media_attached: bool,
    early_candidates: Vec<IceCandidate>,
}

impl<'a> NegotiationLoop<'a> {
    pub fn new(
        signaling: &'a mut dyn SignalingChannel,
        connection: &'a dyn ConnectionFacade,
        selector: &'a mut MediaSourceSelector,
    ) -> Self {
        Self {
            signaling,
            connection,
            selector,
            state: NegotiationState::Start,
            history: vec![NegotiationState::Start],
            role: None,
            remote: None,
            offer_pending: false,
            media_attached: false,
            early_candidates: Vec::new(),
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Every state the loop went through, starting with `Start`.
    pub fn history(&self) -> &[NegotiationState] {
        &self.history
    }

    /// Joins the room and processes signaling until the remote peer leaves.
    pub async fn run(&mut self) -> Result<(), NegotiationError> {
        let joined = self.signaling.connect().await?;
        info!("Joined room {} as {}", joined.room, joined.role);
        self.role = Some(joined.role);
        self.transition(NegotiationState::RoleResolved(joined.role));

        match joined.role {
            Role::Initiator => {
                self.attach_media().await?;
                let offer = self.connection.create_offer().await?;
                self.connection.set_local_description(offer.clone()).await?;
                self.offer_pending = true;
                self.send_local(offer).await?;
                self.transition(NegotiationState::OfferSent);
            }
            Role::Responder => self.transition(NegotiationState::AwaitingOffer),
        }

        loop {
            match self.signaling.receive().await? {
                SignalMessage::Description(desc) => self.handle_description(desc).await?,
                SignalMessage::Candidate(candidate) => self.handle_candidate(candidate).await?,
                SignalMessage::Bye => {
                    info!("Remote peer left");
                    break;
                }
            }
        }

        self.transition(NegotiationState::Closed);
        if !self.early_candidates.is_empty() {
            return Err(NegotiationError::OrphanedCandidates {
                count: self.early_candidates.len(),
            });
        }
        Ok(())
    }

    async fn handle_description(&mut self, desc: SessionDescription) -> Result<(), NegotiationError> {
        let received = desc.kind;
        if let Some(existing) = self.remote {
            return Err(NegotiationError::DuplicateRemoteDescription { existing, received });
        }
        if received == SdpType::Answer && !self.offer_pending {
            return Err(NegotiationError::UnexpectedAnswer);
        }

        debug!("Applying remote {:?}", received);
        self.connection.set_remote_description(desc).await?;
        self.remote = Some(received);
        self.flush_candidates().await?;

        match received {
            SdpType::Offer => {
                self.attach_media().await?;
                let answer = self.connection.create_answer().await?;
                self.connection.set_local_description(answer.clone()).await?;
                self.send_local(answer).await?;
            }
            SdpType::Answer => self.offer_pending = false,
        }

        self.transition(NegotiationState::Connected);
        Ok(())
    }

    async fn handle_candidate(&mut self, candidate: IceCandidate) -> Result<(), NegotiationError> {
        if self.remote.is_none() {
            debug!("Holding candidate until a remote description is applied");
            self.early_candidates.push(candidate);
            return Ok(());
        }
        self.connection.add_ice_candidate(candidate).await?;
        Ok(())
    }

    async fn flush_candidates(&mut self) -> Result<(), NegotiationError> {
        if !self.early_candidates.is_empty() {
            debug!("Applying {} held candidates", self.early_candidates.len());
        }
        for candidate in std::mem::take(&mut self.early_candidates) {
            self.connection.add_ice_candidate(candidate).await?;
        }
        Ok(())
    }

    async fn attach_media(&mut self) -> Result<(), NegotiationError> {
        if self.media_attached {
            return Ok(());
        }
        for track in self.selector.select().await {
            debug!("Attaching {} track from {:?}", track.kind, track.origin);
            self.connection.add_track(track).await?;
        }
        self.media_attached = true;
        Ok(())
    }

    // Prefer the transport's view, which includes gathered candidates.
    async fn send_local(&mut self, created: SessionDescription) -> Result<(), NegotiationError> {
        let desc = self
            .connection
            .local_description()
            .await
            .unwrap_or(created);
        self.signaling.send(desc.into()).await?;
        Ok(())
    }

    fn transition(&mut self, next: NegotiationState) {
        debug!("Negotiation {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
    }
}
