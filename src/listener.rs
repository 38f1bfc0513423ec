//! Listener capability set and lifecycle event types.
//!
//! [`SocketListener`] is the fixed set of callbacks the transport invokes
//! for one connection's lifetime; [`TransitionObserver`] is the injectable
//! logging seam the recorder drives on each accepted transition.

use std::sync::Arc;

use crate::error::TransportError;

/// Close code for a normal closure.
pub const CLOSE_NORMAL: u16 = 1000;
/// Close code recorded when the peer closed without sending a status.
pub const CLOSE_NO_STATUS: u16 = 1005;

/// Close information delivered when the peer completes the closing handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosePayload {
    /// Close code from the peer's close frame.
    pub code: u16,
    /// Close reason, empty when the peer sent none.
    pub reason: String,
}

impl ClosePayload {
    /// Create a close payload with the given code and reason.
    #[must_use]
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// Payload for a normal closure (code 1000).
    #[must_use]
    pub fn normal(reason: impl Into<String>) -> Self { Self::new(CLOSE_NORMAL, reason) }

    /// Payload recorded when the connection closed without a status code.
    #[must_use]
    pub fn no_status() -> Self { Self::new(CLOSE_NO_STATUS, String::new()) }
}

/// A lifecycle transition observed on one connection.
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    /// The upgrade completed and the channel is live.
    Opened,
    /// The peer completed the closing handshake.
    Closed(ClosePayload),
    /// The connection failed after opening.
    Errored(Arc<TransportError>),
}

impl LifecycleEvent {
    /// Whether this event terminates the connection's lifecycle.
    #[must_use]
    pub fn is_terminal(&self) -> bool { matches!(self, Self::Closed(_) | Self::Errored(_)) }
}

/// Callbacks invoked by the transport's dispatch task.
///
/// Implementations are invoked exclusively by the transport, never by test
/// code, and may be called from a different task than the one awaiting the
/// connect future. Each callback must return promptly; the dispatch loop for
/// the connection is blocked while it runs.
pub trait SocketListener: Send + Sync + 'static {
    /// The upgrade completed and the channel is live.
    fn on_open(&self);
    /// The peer completed the closing handshake.
    fn on_close(&self, payload: ClosePayload);
    /// The connection failed after opening.
    fn on_error(&self, error: Arc<TransportError>);
}

/// Observer invoked on each transition the recorder accepts.
///
/// Decoupled from recording so logging or test instrumentation can be
/// injected without touching the state machine. A panic inside the observer
/// never propagates into the transport's dispatch path; the recorder
/// isolates it and records it as a secondary error.
pub trait TransitionObserver: Send + Sync + 'static {
    /// Called after the transition has been recorded.
    fn on_transition(&self, event: &LifecycleEvent);
}

/// Default observer logging transitions with structured `tracing` fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TransitionObserver for TracingObserver {
    fn on_transition(&self, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::Opened => tracing::debug!("connection opened"),
            LifecycleEvent::Closed(payload) => {
                tracing::debug!(code = payload.code, reason = %payload.reason, "connection closed");
            }
            LifecycleEvent::Errored(error) => {
                tracing::warn!(error = %error, "connection errored");
            }
        }
    }
}
