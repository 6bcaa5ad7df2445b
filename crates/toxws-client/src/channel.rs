//! In-memory duplex text channel.
//!
//! The correlation client only needs "write a text payload" and "receive the
//! next text payload in arrival order". [`DuplexChannel`] provides exactly
//! that over a pair of unbounded `tokio` queues, so the client can sit on a
//! WebSocket bridge in production and on a scripted peer in tests.

use tokio::sync::mpsc;

/// One end of a message-oriented, text-payload duplex channel.
pub struct DuplexChannel {
    outbound: mpsc::UnboundedSender<String>,
    inbound: mpsc::UnboundedReceiver<String>,
}

impl DuplexChannel {
    fn new(
        outbound: mpsc::UnboundedSender<String>,
        inbound: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self { outbound, inbound }
    }

    /// Two connected ends: what one sends, the other receives.
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();
        (Self::new(a_tx, b_rx), Self::new(b_tx, a_rx))
    }

    /// Write a payload.
    ///
    /// Returns `false` if the other end has gone away.
    pub fn send(&self, text: impl Into<String>) -> bool {
        self.outbound.send(text.into()).is_ok()
    }

    /// Next payload from the other end, or `None` once it has closed.
    pub async fn recv(&mut self) -> Option<String> {
        self.inbound.recv().await
    }

    /// Whether the other end has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}
