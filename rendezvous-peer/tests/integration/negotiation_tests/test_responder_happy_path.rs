use rendezvous_core::{
    IceCandidate, OutboundSignal, Role, SdpType, SessionDescription, SignalMessage, TrackKind,
};
use rendezvous_peer::{NegotiationLoop, NegotiationState, SourceOrigin};

use crate::integration::{init_tracing, responder, synthetic_only};
use crate::utils::{Call, CallLog, GATHERED, MockConnection};

#[tokio::test]
async fn test_responder_happy_path() {
    init_tracing();

    let log = CallLog::new();
    let mut signaling = responder(&log)
        .then_candidate("c1")
        .then_offer("remote-offer")
        .then_candidate("c2")
        .then_candidate("c3")
        .then_bye();
    let connection = MockConnection::new(log.clone());
    let mut selector = synthetic_only();

    let mut negotiation = NegotiationLoop::new(&mut signaling, &connection, &mut selector);
    negotiation.run().await.expect("negotiation failed");

    assert_eq!(negotiation.role(), Some(Role::Responder));
    assert_eq!(
        negotiation.history(),
        &[
            NegotiationState::Start,
            NegotiationState::RoleResolved(Role::Responder),
            NegotiationState::AwaitingOffer,
            NegotiationState::Connected,
            NegotiationState::Closed,
        ]
    );

    let candidate = |c: &str| SignalMessage::Candidate(IceCandidate::new(c));
    assert_eq!(
        log.calls(),
        vec![
            Call::Connect,
            Call::Received(candidate("c1")),
            Call::Received(SignalMessage::Description(SessionDescription::offer(
                "remote-offer"
            ))),
            Call::SetRemote(SdpType::Offer),
            Call::Candidate("c1".into()),
            Call::Track(TrackKind::Video, SourceOrigin::SyntheticPattern),
            Call::CreateAnswer,
            Call::SetLocal(SdpType::Answer),
            Call::Sent(OutboundSignal::Description(SessionDescription::answer(
                format!("mock-answer{GATHERED}")
            ))),
            Call::Received(candidate("c2")),
            Call::Candidate("c2".into()),
            Call::Received(candidate("c3")),
            Call::Candidate("c3".into()),
            Call::Received(SignalMessage::Bye),
        ]
    );
}

#[tokio::test]
async fn test_responder_waits_for_offer_before_attaching_media() {
    init_tracing();

    let log = CallLog::new();
    let mut signaling = responder(&log).then_bye();
    let connection = MockConnection::new(log.clone());
    let mut selector = synthetic_only();

    let mut negotiation = NegotiationLoop::new(&mut signaling, &connection, &mut selector);
    negotiation.run().await.expect("negotiation failed");

    assert!(log.tracks().is_empty());
    assert!(log.sent().is_empty());
    assert_eq!(negotiation.state(), NegotiationState::Closed);
}
