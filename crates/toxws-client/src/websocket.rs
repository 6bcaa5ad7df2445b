//! WebSocket transport bridge — thin pump over `tokio-tungstenite`.
//!
//! Connects to the daemon and shuttles text frames between the socket and a
//! [`DuplexChannel`]. No reconnect or backoff: when the socket closes, the
//! channel closes and the correlation client rejects whatever is pending.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::channel::DuplexChannel;

/// Errors establishing the daemon connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The handshake did not finish in time.
    #[error("timed out after {timeout_ms}ms connecting to {url}")]
    Timeout {
        /// Target URL.
        url: String,
        /// How long we waited.
        timeout_ms: u64,
    },
    /// TCP connect or WebSocket handshake failed.
    #[error("failed to connect to {url}: {source}")]
    Handshake {
        /// Target URL.
        url: String,
        /// Underlying error.
        #[source]
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },
}

/// Connect to the daemon and return the client end of a bridged channel.
///
/// The returned handle resolves when the socket closes.
pub async fn connect(
    url: &str,
    timeout: Duration,
) -> Result<(DuplexChannel, JoinHandle<()>), ConnectError> {
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    let (ws, _) = tokio::time::timeout(timeout, connect_async(url))
        .await
        .map_err(|_| ConnectError::Timeout {
            url: url.to_string(),
            timeout_ms,
        })?
        .map_err(|e| ConnectError::Handshake {
            url: url.to_string(),
            source: Box::new(e),
        })?;
    info!(url, "connected to daemon");
    Ok(bridge(ws))
}

/// Pump an established WebSocket into a [`DuplexChannel`].
pub fn bridge<S>(ws: WebSocketStream<S>) -> (DuplexChannel, JoinHandle<()>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (client_end, peer_end) = DuplexChannel::pair();
    let handle = tokio::spawn(pump(ws, peer_end));
    (client_end, handle)
}

async fn pump<S>(ws: WebSocketStream<S>, mut peer: DuplexChannel)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut ws_tx, mut ws_rx) = ws.split();

    loop {
        tokio::select! {
            // Outgoing payload from the client
            out = peer.recv() => {
                let Some(text) = out else {
                    debug!("client end closed, closing socket");
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                };
                if let Err(e) = ws_tx.send(Message::Text(text.into())).await {
                    warn!(error = %e, "websocket write failed");
                    break;
                }
            }
            // Incoming frame from the daemon
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if !peer.send(text.as_str()) {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("websocket closed by daemon");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary and control frames carry no protocol payload.
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "websocket read failed");
                        break;
                    }
                }
            }
        }
    }
}
