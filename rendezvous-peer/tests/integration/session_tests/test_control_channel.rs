use std::sync::{Arc, Mutex};

use bytes::Bytes;
use rendezvous_core::{CONTROL_CHANNEL_LABEL, ChannelState, ControlMessage, TrackKind};
use rendezvous_peer::{ConnectionObserver, Session};

use crate::integration::{init_tracing, responder, synthetic_only};
use crate::utils::{Call, CallLog, MockConnection};

#[derive(Default)]
struct Transcript {
    lines: Mutex<Vec<String>>,
}

impl ConnectionObserver for Transcript {
    fn on_track(&self, kind: TrackKind) {
        self.lines.lock().unwrap().push(format!("track {kind}"));
    }

    fn on_channel_open(&self, label: &str) {
        self.lines.lock().unwrap().push(format!("open {label}"));
    }

    fn on_channel_message(&self, label: &str, message: &ControlMessage) {
        let line = match message {
            ControlMessage::Text(text) => format!("{label} text {text}"),
            ControlMessage::Binary(data) => format!("{label} binary {}", data.len()),
        };
        self.lines.lock().unwrap().push(line);
    }

    fn on_channel_close(&self, label: &str) {
        self.lines.lock().unwrap().push(format!("close {label}"));
    }
}

#[tokio::test]
async fn test_control_channel_is_created_before_joining() {
    init_tracing();

    let log = CallLog::new();
    let connection = MockConnection::new(log.clone());
    let events = connection.observers();
    let signaling = responder(&log).then_offer("remote-offer").then_bye();
    let mut session = Session::new(signaling, connection, synthetic_only());

    session.run().await.expect("session failed");

    let calls = log.calls();
    assert_eq!(calls[0], Call::DataChannel(CONTROL_CHANNEL_LABEL.to_string()));
    assert_eq!(
        events.channel_state(CONTROL_CHANNEL_LABEL),
        Some(ChannelState::Connecting)
    );
    assert_eq!(calls[1], Call::Connect);
}

#[tokio::test]
async fn test_observers_see_events_without_touching_negotiation() {
    init_tracing();

    let log = CallLog::new();
    let connection = MockConnection::new(log.clone());
    let events = connection.observers();
    let transcript = Arc::new(Transcript::default());

    let signaling = responder(&log).then_offer("remote-offer").then_bye();
    let mut session =
        Session::new(signaling, connection, synthetic_only()).with_observer(transcript.clone());

    events.channel_open(CONTROL_CHANNEL_LABEL);
    events.track(TrackKind::Audio);
    events.channel_message(
        CONTROL_CHANNEL_LABEL,
        &ControlMessage::classify(true, Bytes::from_static(b"hello")),
    );
    events.channel_message(
        CONTROL_CHANNEL_LABEL,
        &ControlMessage::classify(false, Bytes::from_static(&[0, 1, 2])),
    );
    events.channel_close(CONTROL_CHANNEL_LABEL);
    assert_eq!(
        events.channel_state(CONTROL_CHANNEL_LABEL),
        Some(ChannelState::Closed)
    );

    session.run().await.expect("session failed");

    assert_eq!(
        *transcript.lines.lock().unwrap(),
        vec![
            "open control",
            "track audio",
            "control text hello",
            "control binary 3",
            "close control",
        ]
    );
    assert_eq!(log.sent().len(), 1);
}
