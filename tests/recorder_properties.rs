//! Property tests for the recorder's terminal-state contract.
//!
//! The recorder must honour first-terminal-wins for any event sequence a
//! transport could deliver, including concurrent delivery from another
//! thread.

use std::sync::Arc;

use proptest::prelude::*;
use wsprobe::{
    ClosePayload,
    EventRecorder,
    RecorderState,
    SocketListener,
    TransportError,
    TransportErrorKind,
};

/// An event as a transport would deliver it.
#[derive(Debug, Clone)]
enum Delivered {
    Open,
    Close(u16, String),
    Error(String),
}

impl Delivered {
    fn is_terminal(&self) -> bool { !matches!(self, Self::Open) }

    fn deliver(&self, recorder: &EventRecorder) {
        match self {
            Self::Open => recorder.on_open(),
            Self::Close(code, reason) => {
                recorder.on_close(ClosePayload::new(*code, reason.clone()));
            }
            Self::Error(message) => recorder.on_error(Arc::new(TransportError::new(
                TransportErrorKind::Protocol,
                message.clone(),
            ))),
        }
    }
}

fn event_strategy() -> impl Strategy<Value = Delivered> {
    prop_oneof![
        Just(Delivered::Open),
        (1000u16..1016, "[a-z]{0,8}").prop_map(|(code, reason)| Delivered::Close(code, reason)),
        "[a-z]{1,8}".prop_map(Delivered::Error),
    ]
}

proptest! {
    #[test]
    fn first_terminal_event_wins(events in proptest::collection::vec(event_strategy(), 0..12)) {
        let recorder = EventRecorder::new();
        for event in &events {
            event.deliver(&recorder);
        }

        match events.iter().find(|event| event.is_terminal()) {
            Some(Delivered::Close(code, reason)) => {
                prop_assert_eq!(recorder.state(), RecorderState::Closed);
                prop_assert_eq!(
                    recorder.last_close(),
                    Some(ClosePayload::new(*code, reason.clone()))
                );
                prop_assert!(recorder.last_error().is_none());
            }
            Some(Delivered::Error(message)) => {
                prop_assert_eq!(recorder.state(), RecorderState::Errored);
                let error = recorder.last_error().expect("terminal error should be recorded");
                prop_assert_eq!(error.message(), message.as_str());
                prop_assert!(recorder.last_close().is_none());
            }
            Some(Delivered::Open) => unreachable!("open is not terminal"),
            None => {
                // Only opens (or nothing) were delivered.
                let expected = if events.is_empty() {
                    RecorderState::Idle
                } else {
                    RecorderState::Opened
                };
                prop_assert_eq!(recorder.state(), expected);
                prop_assert!(recorder.last_error().is_none());
                prop_assert!(recorder.last_close().is_none());
            }
        }

        // Accessors are idempotent without new events.
        prop_assert_eq!(recorder.state(), recorder.state());
    }
}

#[test]
fn concurrent_terminal_events_record_exactly_one_outcome() {
    for _ in 0..64 {
        let recorder = EventRecorder::new();

        let closer = {
            let recorder = recorder.clone();
            std::thread::spawn(move || recorder.on_close(ClosePayload::normal("bye")))
        };
        let errorer = {
            let recorder = recorder.clone();
            std::thread::spawn(move || {
                recorder.on_error(Arc::new(TransportError::new(
                    TransportErrorKind::Io,
                    "reset",
                )));
            })
        };
        closer.join().expect("close thread should not panic");
        errorer.join().expect("error thread should not panic");

        match recorder.state() {
            RecorderState::Closed => {
                assert_eq!(recorder.last_close(), Some(ClosePayload::normal("bye")));
                assert!(recorder.last_error().is_none());
            }
            RecorderState::Errored => {
                assert!(recorder.last_error().is_some());
                assert!(recorder.last_close().is_none());
            }
            other => panic!("expected a terminal state, got {other:?}"),
        }
    }
}
