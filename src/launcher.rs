//! Connection launcher: one upgrade attempt per call.

use std::sync::Arc;

use crate::{
    connection::Connection,
    error::ConnectError,
    listener::SocketListener,
    request::ConnectRequest,
    transport::{Transport, WsTransport},
};

/// Issues single outbound connection attempts through a [`Transport`].
///
/// The launcher never retries and enforces no timeout. Callers wanting a
/// deadline race the returned future against a timer and abandon the
/// attempt on expiry; the transport's connection then stays open until it
/// independently closes or errors.
#[derive(Debug, Clone, Default)]
pub struct ConnectionLauncher<T = WsTransport> {
    transport: T,
}

impl ConnectionLauncher<WsTransport> {
    /// Create a launcher backed by the default WebSocket transport.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl<T: Transport> ConnectionLauncher<T> {
    /// Create a launcher over a custom transport capability.
    #[must_use]
    pub fn with_transport(transport: T) -> Self { Self { transport } }

    /// Open one connection described by `request`, registering `listener`
    /// as the event sink for the connection's entire lifetime.
    ///
    /// The returned [`Connection`] is owned by the caller; the harness does
    /// not close it.
    ///
    /// # Errors
    /// [`ConnectError::InvalidRequest`] before any network I/O when the
    /// request fails validation; [`ConnectError::Handshake`] when the
    /// upgrade fails. Neither reaches the listener — upgrade failures
    /// surface through the future, post-upgrade failures through the
    /// listener.
    pub async fn connect(
        &self,
        request: ConnectRequest,
        listener: Arc<dyn SocketListener>,
    ) -> Result<Connection, ConnectError> {
        self.transport.connect(request, listener).await
    }
}

/// Connect to `url` with the default transport, sending `origin` as the
/// `Origin` header.
///
/// Equivalent to a default [`ConnectionLauncher`] driving
/// [`ConnectRequest::new`]`(url).origin(origin)`.
///
/// # Errors
/// See [`ConnectionLauncher::connect`].
pub async fn connect(
    url: impl Into<String>,
    origin: impl Into<String>,
    listener: Arc<dyn SocketListener>,
) -> Result<Connection, ConnectError> {
    ConnectionLauncher::new()
        .connect(ConnectRequest::new(url).origin(origin), listener)
        .await
}
