use crate::media::MediaSourceSelector;
use crate::negotiation::{NegotiationError, NegotiationLoop, NegotiationState};
use crate::signaling::SignalingChannel;
use crate::transport::{ConnectionFacade, ConnectionObserver};
use rendezvous_core::DataChannelConfig;
use std::future::{Future, pending};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The remote peer said bye.
    Completed,
    /// The shutdown future fired first.
    Interrupted,
}

/// Owns the signaling channel and the connection for one room visit.
///
/// Whatever happens during negotiation, both are closed before `run`
/// returns: signaling first, then the connection.
pub struct Session<S, C> {
    signaling: S,
    connection: C,
    selector: MediaSourceSelector,
    history: Vec<NegotiationState>,
}

impl<S, C> Session<S, C>
where
    S: SignalingChannel,
    C: ConnectionFacade,
{
    pub fn new(signaling: S, connection: C, selector: MediaSourceSelector) -> Self {
        Self {
            signaling,
            connection,
            selector,
            history: Vec::new(),
        }
    }

    pub fn with_observer(self, observer: Arc<dyn ConnectionObserver>) -> Self {
        self.connection.observe(observer);
        self
    }

    /// States the last negotiation went through.
    pub fn history(&self) -> &[NegotiationState] {
        &self.history
    }

    pub async fn run(&mut self) -> Result<SessionOutcome, NegotiationError> {
        self.run_until(pending::<()>()).await
    }

    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<SessionOutcome, NegotiationError>
    where
        F: Future<Output = ()>,
    {
        let result = self.negotiate(shutdown).await;
        if let Err(e) = &result {
            warn!("Session failed: {}", e);
        }
        self.cleanup().await;
        result
    }

    async fn negotiate<F>(&mut self, shutdown: F) -> Result<SessionOutcome, NegotiationError>
    where
        F: Future<Output = ()>,
    {
        self.connection
            .create_data_channel(DataChannelConfig::control())
            .await?;

        let mut negotiation =
            NegotiationLoop::new(&mut self.signaling, &self.connection, &mut self.selector);

        let outcome = tokio::select! {
            result = negotiation.run() => result.map(|()| SessionOutcome::Completed),
            () = shutdown => {
                info!("Interrupted, leaving the room");
                Ok(SessionOutcome::Interrupted)
            }
        };

        self.history = negotiation.history().to_vec();
        outcome
    }

    async fn cleanup(&mut self) {
        if let Err(e) = self.signaling.close().await {
            warn!("Closing signaling failed: {}", e);
        }
        if let Err(e) = self.connection.close().await {
            warn!("Closing connection failed: {}", e);
        }
        info!("Session closed");
    }
}
