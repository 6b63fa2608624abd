use rendezvous_core::{
    OutboundSignal, Role, SdpType, SessionDescription, SignalMessage, TrackKind,
};
use rendezvous_peer::{NegotiationLoop, NegotiationState, SourceOrigin};

use crate::integration::{init_tracing, initiator, synthetic_only};
use crate::utils::{Call, CallLog, GATHERED, MockConnection};

#[tokio::test]
async fn test_initiator_happy_path() {
    init_tracing();

    let log = CallLog::new();
    let mut signaling = initiator(&log).then_answer("remote-answer").then_bye();
    let connection = MockConnection::new(log.clone());
    let mut selector = synthetic_only();

    let mut negotiation = NegotiationLoop::new(&mut signaling, &connection, &mut selector);
    negotiation.run().await.expect("negotiation failed");

    assert_eq!(negotiation.role(), Some(Role::Initiator));
    assert_eq!(negotiation.state(), NegotiationState::Closed);
    assert_eq!(
        negotiation.history(),
        &[
            NegotiationState::Start,
            NegotiationState::RoleResolved(Role::Initiator),
            NegotiationState::OfferSent,
            NegotiationState::Connected,
            NegotiationState::Closed,
        ]
    );

    assert_eq!(
        log.calls(),
        vec![
            Call::Connect,
            Call::Track(TrackKind::Video, SourceOrigin::SyntheticPattern),
            Call::CreateOffer,
            Call::SetLocal(SdpType::Offer),
            Call::Sent(OutboundSignal::Description(SessionDescription::offer(
                format!("mock-offer{GATHERED}")
            ))),
            Call::Received(SignalMessage::Description(SessionDescription::answer(
                "remote-answer"
            ))),
            Call::SetRemote(SdpType::Answer),
            Call::Received(SignalMessage::Bye),
        ]
    );
}

#[tokio::test]
async fn test_initiator_never_answers() {
    init_tracing();

    let log = CallLog::new();
    let mut signaling = initiator(&log)
        .then_candidate("candidate:1 1 udp 1 10.0.0.1 9 typ host")
        .then_answer("remote-answer")
        .then_bye();
    let connection = MockConnection::new(log.clone());
    let mut selector = synthetic_only();

    NegotiationLoop::new(&mut signaling, &connection, &mut selector)
        .run()
        .await
        .expect("negotiation failed");

    assert_eq!(log.count(|c| *c == Call::CreateAnswer), 0);
    assert_eq!(log.count(|c| *c == Call::CreateOffer), 1);
    assert_eq!(log.sent().len(), 1);
}
