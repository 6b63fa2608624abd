use rendezvous_core::SdpType;
use rendezvous_peer::{NegotiationError, NegotiationLoop, NegotiationState, SignalingError};

use crate::integration::{init_tracing, initiator, responder, synthetic_only};
use crate::utils::{Call, CallLog, MockConnection, MockSignaling};

async fn run(mut signaling: MockSignaling, connection: MockConnection) -> Result<(), NegotiationError> {
    let mut selector = synthetic_only();
    let mut negotiation = NegotiationLoop::new(&mut signaling, &connection, &mut selector);
    negotiation.run().await
}

#[tokio::test]
async fn test_second_offer_is_rejected() {
    init_tracing();

    let log = CallLog::new();
    let signaling = responder(&log).then_offer("first").then_offer("second").then_bye();
    let result = run(signaling, MockConnection::new(log.clone())).await;

    assert!(matches!(
        result,
        Err(NegotiationError::DuplicateRemoteDescription {
            existing: SdpType::Offer,
            received: SdpType::Offer,
        })
    ));
    assert_eq!(log.count(|c| matches!(c, Call::SetRemote(_))), 1);
    assert_eq!(log.count(|c| *c == Call::CreateAnswer), 1);
}

#[tokio::test]
async fn test_second_answer_is_rejected() {
    init_tracing();

    let log = CallLog::new();
    let signaling = initiator(&log).then_answer("first").then_answer("again");
    let result = run(signaling, MockConnection::new(log.clone())).await;

    assert!(matches!(
        result,
        Err(NegotiationError::DuplicateRemoteDescription {
            existing: SdpType::Answer,
            received: SdpType::Answer,
        })
    ));
}

#[tokio::test]
async fn test_answer_without_offer_is_rejected() {
    init_tracing();

    let log = CallLog::new();
    let signaling = responder(&log).then_answer("stray").then_bye();
    let result = run(signaling, MockConnection::new(log.clone())).await;

    assert!(matches!(result, Err(NegotiationError::UnexpectedAnswer)));
    assert_eq!(log.count(|c| matches!(c, Call::SetRemote(_))), 0);
}

#[tokio::test]
async fn test_candidates_without_description_are_reported() {
    init_tracing();

    let log = CallLog::new();
    let mut signaling = responder(&log).then_candidate("c1").then_candidate("c2").then_bye();
    let connection = MockConnection::new(log.clone());
    let mut selector = synthetic_only();

    let mut negotiation = NegotiationLoop::new(&mut signaling, &connection, &mut selector);
    let result = negotiation.run().await;

    assert!(matches!(
        result,
        Err(NegotiationError::OrphanedCandidates { count: 2 })
    ));
    assert_eq!(negotiation.state(), NegotiationState::Closed);
    assert!(log.candidates().is_empty());
}

#[tokio::test]
async fn test_signaling_errors_are_not_retried() {
    init_tracing();

    let log = CallLog::new();
    let signaling = responder(&log)
        .then_error(SignalingError::Malformed("not json".into()))
        .then_offer("never read");
    let result = run(signaling, MockConnection::new(log.clone())).await;

    assert!(matches!(
        result,
        Err(NegotiationError::Signaling(SignalingError::Malformed(_)))
    ));
    assert_eq!(log.count(|c| matches!(c, Call::SetRemote(_))), 0);
}

#[tokio::test]
async fn test_transport_errors_end_negotiation() {
    init_tracing();

    let log = CallLog::new();
    let signaling = responder(&log).then_offer("remote-offer").then_bye();
    let connection = MockConnection::new(log.clone()).failing_remote_description();
    let result = run(signaling, connection).await;

    assert!(matches!(result, Err(NegotiationError::Transport(_))));
    assert!(log.sent().is_empty());
}

#[tokio::test]
async fn test_connect_failure_stops_before_any_media() {
    init_tracing();

    let log = CallLog::new();
    let signaling = initiator(&log).failing_connect();
    let result = run(signaling, MockConnection::new(log.clone())).await;

    assert!(matches!(
        result,
        Err(NegotiationError::Signaling(SignalingError::RoomFull(_)))
    ));
    assert_eq!(log.calls(), vec![Call::Connect]);
}
