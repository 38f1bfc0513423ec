//! Public API for the `wsprobe` library.
//!
//! `wsprobe` is a small async connection-test harness for WebSocket
//! endpoints. It opens a single outbound connection to a server under test,
//! forwards lifecycle events (open, close, error) to a caller-supplied
//! listener, and exposes the connect attempt as a future the test awaits.
//! The handshake and framing are delegated entirely to `tokio-tungstenite`;
//! the harness adds no retries, no timeouts, and no protocol machinery.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use wsprobe::{ConnectRequest, ConnectionLauncher, EventRecorder, RecorderState};
//!
//! # async fn demo() -> Result<(), wsprobe::ConnectError> {
//! let recorder = EventRecorder::new();
//! let launcher = ConnectionLauncher::new();
//! let request = ConnectRequest::new("wss://echo.example/socket").origin("http://test.local");
//!
//! let connection = launcher
//!     .connect(request, Arc::new(recorder.clone()))
//!     .await?;
//! assert_eq!(recorder.state(), RecorderState::Opened);
//! # drop(connection);
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod launcher;
pub mod listener;
pub mod recorder;
pub mod request;
pub mod transport;

pub use connection::Connection;
pub use error::{ConnectError, InvalidRequest, TransportError, TransportErrorKind};
pub use launcher::{ConnectionLauncher, connect};
pub use listener::{
    ClosePayload,
    LifecycleEvent,
    SocketListener,
    TracingObserver,
    TransitionObserver,
};
pub use recorder::{EventRecorder, RecorderState};
pub use request::ConnectRequest;
pub use transport::{Transport, WsTransport};
