//! Lifecycle recorder backing test assertions.
//!
//! [`EventRecorder`] passively records the lifecycle events delivered for a
//! single connection attempt so a test can assert on them after the connect
//! future settles. It never initiates action of its own.

use std::{
    any::Any,
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    error::TransportError,
    listener::{ClosePayload, LifecycleEvent, SocketListener, TransitionObserver},
};

/// Position of one connection in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No event has arrived yet.
    Idle,
    /// The upgrade completed.
    Opened,
    /// The peer completed the closing handshake. Terminal.
    Closed,
    /// The connection failed. Terminal.
    Errored,
}

impl RecorderState {
    /// Whether no further transitions are accepted from this state.
    #[must_use]
    pub fn is_terminal(self) -> bool { matches!(self, Self::Closed | Self::Errored) }
}

struct Recorded {
    state: RecorderState,
    close: Option<ClosePayload>,
    error: Option<Arc<TransportError>>,
}

impl Recorded {
    /// Apply `event`, returning whether it was accepted.
    ///
    /// First-terminal-wins: once `Closed` or `Errored` is recorded, later
    /// events are ignored so a duplicate-delivering transport cannot disturb
    /// assertions made against the original outcome.
    fn apply(&mut self, event: &LifecycleEvent) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        match event {
            LifecycleEvent::Opened => self.state = RecorderState::Opened,
            LifecycleEvent::Closed(payload) => {
                self.state = RecorderState::Closed;
                self.close = Some(payload.clone());
            }
            LifecycleEvent::Errored(error) => {
                self.state = RecorderState::Errored;
                self.error = Some(Arc::clone(error));
            }
        }
        true
    }
}

/// Records lifecycle events for a single connection attempt.
///
/// Cloning yields another handle over the same recorded state, so a test can
/// keep one handle while the transport drives another. Callbacks may race
/// accessor reads from the test; every transition is applied under one
/// internal lock, making first-terminal-wins race-free.
///
/// # Examples
///
/// ```
/// use wsprobe::{EventRecorder, RecorderState, SocketListener};
///
/// let recorder = EventRecorder::new();
/// assert_eq!(recorder.state(), RecorderState::Idle);
/// recorder.on_open();
/// assert_eq!(recorder.state(), RecorderState::Opened);
/// ```
#[derive(Clone)]
pub struct EventRecorder {
    recorded: Arc<Mutex<Recorded>>,
    observer: Option<Arc<dyn TransitionObserver>>,
}

impl EventRecorder {
    /// Create a recorder with no transition observer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            recorded: Arc::new(Mutex::new(Recorded {
                state: RecorderState::Idle,
                close: None,
                error: None,
            })),
            observer: None,
        }
    }

    /// Create a recorder that notifies `observer` on each accepted
    /// transition.
    ///
    /// The observer runs outside the recording lock, after the transition
    /// has been applied. A panicking observer is isolated and recorded as a
    /// secondary error rather than unwinding into the transport.
    #[must_use]
    pub fn with_observer(observer: impl TransitionObserver) -> Self {
        Self {
            observer: Some(Arc::new(observer)),
            ..Self::new()
        }
    }

    /// Current lifecycle state. Safe to call at any time; repeated calls
    /// without new events return the same value.
    #[must_use]
    pub fn state(&self) -> RecorderState { self.lock().state }

    /// Whether a terminal event has been recorded.
    #[must_use]
    pub fn is_terminal(&self) -> bool { self.state().is_terminal() }

    /// The close payload, when the recorded outcome is `Closed`.
    #[must_use]
    pub fn last_close(&self) -> Option<ClosePayload> { self.lock().close.clone() }

    /// The observed error, when the recorded outcome is `Errored`.
    #[must_use]
    pub fn last_error(&self) -> Option<Arc<TransportError>> { self.lock().error.clone() }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        // A panic while holding the lock leaves only a half-applied event;
        // recorded state is still coherent for assertions.
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: &LifecycleEvent) {
        let accepted = self.lock().apply(event);
        if accepted {
            self.notify(event);
        }
    }

    fn notify(&self, event: &LifecycleEvent) {
        let Some(observer) = &self.observer else {
            return;
        };
        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| observer.on_transition(event))) {
            let detail = panic_detail(panic.as_ref());
            tracing::error!(panic = %detail, "transition observer panicked");
            let error = Arc::new(TransportError::observer_panic(&detail));
            // Secondary error, subject to first-terminal-wins. The observer
            // is not re-notified to avoid a panic loop.
            self.lock().apply(&LifecycleEvent::Errored(error));
        }
    }
}

impl Default for EventRecorder {
    fn default() -> Self { Self::new() }
}

impl SocketListener for EventRecorder {
    fn on_open(&self) { self.record(&LifecycleEvent::Opened); }

    fn on_close(&self, payload: ClosePayload) { self.record(&LifecycleEvent::Closed(payload)); }

    fn on_error(&self, error: Arc<TransportError>) {
        self.record(&LifecycleEvent::Errored(error));
    }
}

impl fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recorded = self.lock();
        f.debug_struct("EventRecorder")
            .field("state", &recorded.state)
            .field("close", &recorded.close)
            .field("error", &recorded.error)
            .finish()
    }
}

/// Downcast a panic payload to `String` or `&str`, falling back to a
/// placeholder for other payload types.
fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&'static str>() {
        (*s).to_owned()
    } else {
        "opaque panic payload".to_owned()
    }
}
