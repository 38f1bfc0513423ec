//! Shared utilities for integration tests.
//!
//! Provides helpers to spawn a single-connection WebSocket server on an
//! ephemeral local port and to poll recorder state with a deadline. These
//! helpers reduce duplication across test modules.

// Items in this shared module may not be used by all test binaries that import it.
#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use std::{future::Future, net::SocketAddr, time::Duration};

use futures::StreamExt;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
};
use tokio_tungstenite::{
    WebSocketStream,
    tungstenite::handshake::server::{ErrorResponse, Request, Response},
};

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Spawn a WebSocket server bound to a free local port that runs `handler`
/// on the first accepted connection.
pub async fn spawn_ws_server<F, Fut>(handler: F) -> TestResult<(String, JoinHandle<()>)>
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let task = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept client");
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("upgrade client");
        handler(ws).await;
    });
    Ok((server_url(addr), task))
}

/// Spawn a server that records the named header presented during the
/// upgrade, then keeps the connection open until the client goes away.
pub async fn spawn_header_capturing_server(
    header: &'static str,
) -> TestResult<(String, oneshot::Receiver<Option<String>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (header_tx, header_rx) = oneshot::channel();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept client");
        let callback =
            move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                let value = request
                    .headers()
                    .get(header)
                    .and_then(|value| value.to_str().ok())
                    .map(ToOwned::to_owned);
                let _ = header_tx.send(value);
                Ok(response)
            };
        let mut ws = tokio_tungstenite::accept_hdr_async(stream, callback)
            .await
            .expect("upgrade client");
        while ws.next().await.is_some() {}
    });
    Ok((server_url(addr), header_rx))
}

fn server_url(addr: SocketAddr) -> String { format!("ws://{addr}/socket") }

/// Poll `condition` until it holds or a five-second deadline passes.
pub async fn wait_until(condition: impl Fn() -> bool) -> TestResult {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await?;
    Ok(())
}
