//! Transport seam and the tungstenite-backed default.
//!
//! [`Transport`] is the opaque connect capability the launcher consumes.
//! [`WsTransport`] delegates the entire handshake and framing to
//! `tokio-tungstenite` and forwards lifecycle events to the registered
//! listener from a single dispatch task.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, stream::SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream,
    WebSocketStream,
    tungstenite::{self, Message},
};

use crate::{
    connection::Connection,
    error::{ConnectError, TransportError},
    listener::{ClosePayload, SocketListener},
    request::ConnectRequest,
};

type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Opaque connect capability consumed by the launcher.
///
/// Implementations make exactly one upgrade attempt per call and register
/// `listener` as the event sink for the connection's entire lifetime.
/// Pre-open failures are returned from the future and must not reach the
/// listener; post-open failures go to the listener and nowhere else.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open one connection described by `request`.
    async fn connect(
        &self,
        request: ConnectRequest,
        listener: Arc<dyn SocketListener>,
    ) -> Result<Connection, ConnectError>;
}

/// Default transport delegating handshake and framing to `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

#[async_trait]
impl Transport for WsTransport {
    async fn connect(
        &self,
        request: ConnectRequest,
        listener: Arc<dyn SocketListener>,
    ) -> Result<Connection, ConnectError> {
        let url = request.url().to_owned();
        // Validation completes before any I/O is attempted.
        let handshake = request.into_handshake()?;

        let (stream, response) = tokio_tungstenite::connect_async(handshake)
            .await
            .map_err(ConnectError::Handshake)?;
        tracing::debug!(%url, status = %response.status(), "WebSocket upgrade accepted");

        let (sink, source) = stream.split();
        listener.on_open();
        tokio::spawn(dispatch_events(source, listener));

        Ok(Connection::new(url, sink))
    }
}

/// Forward lifecycle events from the read half until the connection ends.
///
/// Exactly one terminal event is delivered per connection; the task stops
/// reading once it has been sent. Data frames are out of scope for the
/// harness and are only traced.
async fn dispatch_events(mut source: WsSource, listener: Arc<dyn SocketListener>) {
    while let Some(item) = source.next().await {
        match item {
            Ok(Message::Close(frame)) => {
                let payload = frame.map_or_else(ClosePayload::no_status, |frame| {
                    ClosePayload::new(frame.code.into(), frame.reason.to_string())
                });
                tracing::debug!(code = payload.code, reason = %payload.reason, "close frame received");
                listener.on_close(payload);
                return;
            }
            Ok(message) => {
                tracing::trace!(kind = frame_kind(&message), "ignoring non-lifecycle frame");
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                // The framing layer saw the close handshake complete without
                // surfacing a close frame to us.
                listener.on_close(ClosePayload::no_status());
                return;
            }
            Err(error) => {
                tracing::warn!(error = %error, "transport failure after open");
                listener.on_error(Arc::new(TransportError::from_tungstenite(&error)));
                return;
            }
        }
    }
    // The stream ended with no close frame and no error.
    listener.on_error(Arc::new(TransportError::abnormal_close()));
}

fn frame_kind(message: &Message) -> &'static str {
    match message {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "raw",
    }
}
