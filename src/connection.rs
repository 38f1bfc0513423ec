//! Caller-owned handle to an upgraded connection.

use std::fmt;

use futures::{SinkExt, stream::SplitSink};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream,
    WebSocketStream,
    tungstenite::{
        Message,
        protocol::{CloseFrame, frame::coding::CloseCode},
    },
};

use crate::{error::TransportError, listener::ClosePayload};

pub(crate) type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Handle to the open channel, owned by the caller once the connect future
/// resolves.
///
/// The harness performs no lifecycle management of its own: dropping the
/// handle abandons the socket, which stays open until the peer closes it or
/// it errors. Lifecycle events keep flowing to the registered listener
/// either way.
pub struct Connection {
    url: String,
    sink: WsSink,
}

impl Connection {
    pub(crate) fn new(url: String, sink: WsSink) -> Self { Self { url, sink } }

    /// The URL this connection was opened against.
    #[must_use]
    pub fn url(&self) -> &str { &self.url }

    /// Send a text frame to the peer.
    ///
    /// # Errors
    /// Returns a [`TransportError`] when the frame cannot be written, for
    /// example after the peer has closed the connection.
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<(), TransportError> {
        self.send(Message::text(text.into())).await
    }

    /// Send a binary frame to the peer.
    ///
    /// # Errors
    /// Returns a [`TransportError`] when the frame cannot be written.
    pub async fn send_binary(&mut self, data: impl Into<Vec<u8>>) -> Result<(), TransportError> {
        self.send(Message::binary(data.into())).await
    }

    /// Start the closing handshake, optionally with a code and reason.
    ///
    /// # Errors
    /// Returns a [`TransportError`] when the close frame cannot be written.
    pub async fn close(&mut self, payload: Option<ClosePayload>) -> Result<(), TransportError> {
        let frame = payload.map(|payload| CloseFrame {
            code: CloseCode::from(payload.code),
            reason: payload.reason.into(),
        });
        self.send(Message::Close(frame)).await
    }

    async fn send(&mut self, message: Message) -> Result<(), TransportError> {
        self.sink
            .send(message)
            .await
            .map_err(|error| TransportError::from_tungstenite(&error))
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("url", &self.url).finish()
    }
}
