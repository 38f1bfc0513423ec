//! Error types for harness operations.
//!
//! Failures are split by where they surface: [`InvalidRequest`] is returned
//! before any network I/O, [`ConnectError`] is the failure channel of the
//! connect future, and [`TransportError`] describes post-open failures that
//! are only ever reported through the listener.

use tokio_tungstenite::tungstenite;

/// Reasons a [`crate::ConnectRequest`] fails validation.
///
/// Detected before any network I/O and never retried; the caller must fix
/// the request.
#[derive(Debug, thiserror::Error)]
pub enum InvalidRequest {
    /// The target URL could not be parsed.
    #[error("malformed WebSocket URL `{url}`")]
    Url {
        /// The offending URL.
        url: String,
        /// Parse failure reported by the handshake layer.
        #[source]
        source: tungstenite::Error,
    },
    /// The target URL does not use a WebSocket scheme.
    #[error("URL `{url}` is not a ws:// or wss:// URL")]
    Scheme {
        /// The offending URL.
        url: String,
    },
    /// A header name or value is not a valid HTTP header.
    #[error("invalid header `{name}`")]
    Header {
        /// The offending header name.
        name: String,
        /// Underlying header validation failure.
        #[source]
        source: http::Error,
    },
}

/// Failure channel of the connect future.
///
/// Upgrade failures surface here exactly once and never reach the listener;
/// post-open failures take the opposite path. The harness never retries —
/// retry policy, if wanted, is layered by the caller over the future.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The request failed validation before any I/O.
    #[error("invalid connect request")]
    InvalidRequest(#[from] InvalidRequest),
    /// DNS, TCP, TLS, or handshake failure during the upgrade attempt.
    #[error("WebSocket upgrade failed")]
    Handshake(#[source] tungstenite::Error),
}

/// Classification of a post-open transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Socket-level I/O failure.
    Io,
    /// Protocol violation reported by the framing layer.
    Protocol,
    /// The stream ended without a closing handshake.
    AbnormalClose,
    /// A caller-supplied transition observer panicked.
    ObserverPanic,
}

/// A failure observed on an open connection.
///
/// Reported through [`SocketListener::on_error`](crate::SocketListener::on_error)
/// and recorded for later inspection; never returned from the connect future.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    /// Create a transport error with the given classification and message.
    ///
    /// Custom [`Transport`](crate::Transport) implementations use this to
    /// describe failures delivered to the listener.
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The error's classification.
    #[must_use]
    pub fn kind(&self) -> TransportErrorKind { self.kind }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str { &self.message }

    pub(crate) fn from_tungstenite(error: &tungstenite::Error) -> Self {
        let kind = match error {
            tungstenite::Error::Io(_) => TransportErrorKind::Io,
            _ => TransportErrorKind::Protocol,
        };
        Self::new(kind, error.to_string())
    }

    pub(crate) fn abnormal_close() -> Self {
        Self::new(
            TransportErrorKind::AbnormalClose,
            "connection ended without a closing handshake",
        )
    }

    pub(crate) fn observer_panic(detail: &str) -> Self {
        Self::new(
            TransportErrorKind::ObserverPanic,
            format!("transition observer panicked: {detail}"),
        )
    }
}
