//! FIFO request/response correlation over a [`DuplexChannel`].
//!
//! The daemon puts no request id on the wire. It answers requests strictly
//! in the order it received them, so the client keeps a queue of pending
//! calls and hands each response to the oldest one. Notifications share the
//! channel and are fanned out to [`Subscribers`] instead.
//!
//! One spawned I/O loop owns the channel and the pending queue. Outbound
//! requests reach it over an unbounded queue at call time, and the loop
//! enqueues the pending call and writes the payload in the same step, so
//! queue order always equals write order.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use toxws_core::{
    ClientError, FriendNumber, Inbound, MessageKind, Notification, Request, Response, Result,
};

use crate::channel::DuplexChannel;
use crate::subscribers::{SubscriptionId, Subscribers};

/// Completion handle for one outstanding request.
type PendingTx = oneshot::Sender<Result<Response>>;

/// A serialized request on its way to the I/O loop.
struct Outgoing {
    kind: &'static str,
    payload: String,
    response_tx: PendingTx,
}

// ─────────────────────────────────────────────────────────────────────────────
// PendingResponse
// ─────────────────────────────────────────────────────────────────────────────

/// Future for the response to one request.
///
/// The request has already been handed to the I/O loop when this is
/// returned; dropping it discards the response but does not withdraw the
/// request. There is no timeout: it stays pending until the daemon answers
/// or the connection closes.
#[must_use = "the response is lost unless this future is awaited"]
pub struct PendingResponse {
    rx: oneshot::Receiver<Result<Response>>,
}

impl PendingResponse {
    fn failed(err: ClientError) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(err));
        Self { rx }
    }
}

impl Future for PendingResponse {
    type Output = Result<Response>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|settled| settled.unwrap_or(Err(ClientError::ConnectionClosed)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CorrelationClient
// ─────────────────────────────────────────────────────────────────────────────

/// Typed request/response client for the `ws-tox` daemon.
pub struct CorrelationClient {
    cmd_tx: mpsc::UnboundedSender<Outgoing>,
    subscribers: Arc<Subscribers>,
    handler: JoinHandle<()>,
}

impl CorrelationClient {
    /// Take ownership of a channel and start the I/O loop.
    ///
    /// Must be called from within a `tokio` runtime.
    pub fn spawn(channel: DuplexChannel) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let subscribers = Arc::new(Subscribers::new());
        let handler = tokio::spawn(io_loop(channel, cmd_rx, subscribers.clone()));
        Self {
            cmd_tx,
            subscribers,
            handler,
        }
    }

    /// Send any request and get a future for its response.
    pub fn request(&self, request: &Request) -> PendingResponse {
        let payload = match request.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(kind = request.kind(), error = %e, "failed to serialize request");
                return PendingResponse::failed(ClientError::Serialize(e));
            }
        };
        let (response_tx, rx) = oneshot::channel();
        let outgoing = Outgoing {
            kind: request.kind(),
            payload,
            response_tx,
        };
        if self.cmd_tx.send(outgoing).is_err() {
            // The loop has exited; the dropped sender settles `rx` as closed.
            debug!(kind = request.kind(), "request after connection closed");
        }
        PendingResponse { rx }
    }

    /// Own name and Tox ID.
    pub fn info(&self) -> PendingResponse {
        self.request(&Request::Info)
    }

    /// Send a friend request with a message.
    pub fn add_friend(&self, tox_id: impl Into<String>, message: impl Into<String>) -> PendingResponse {
        self.request(&Request::AddFriend {
            tox_id: tox_id.into(),
            message: message.into(),
        })
    }

    /// Add a friend without sending a friend request.
    pub fn add_friend_norequest(&self, tox_id: impl Into<String>) -> PendingResponse {
        self.request(&Request::AddFriendNorequest {
            tox_id: tox_id.into(),
        })
    }

    /// Send a message to a friend.
    pub fn send_friend_message(
        &self,
        friend: FriendNumber,
        kind: MessageKind,
        message: impl Into<String>,
    ) -> PendingResponse {
        self.request(&Request::SendFriendMessage {
            friend,
            kind,
            message: message.into(),
        })
    }

    /// Register a handler for every future notification.
    ///
    /// Handlers run on the I/O loop, synchronously and in registration
    /// order, so they should return quickly.
    pub fn on_notification(
        &self,
        handler: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(handler)
    }

    /// Remove a notification handler. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Whether the I/O loop has stopped (the channel closed).
    pub fn is_closed(&self) -> bool {
        self.handler.is_finished()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// I/O loop
// ─────────────────────────────────────────────────────────────────────────────

/// Owns the channel and the pending queue.
///
/// Runs until the inbound side closes, a write fails, or the client is
/// dropped with nothing left pending. Every call still pending on exit is
/// rejected with [`ClientError::ConnectionClosed`].
async fn io_loop(
    mut channel: DuplexChannel,
    mut cmd_rx: mpsc::UnboundedReceiver<Outgoing>,
    subscribers: Arc<Subscribers>,
) {
    let mut pending: VecDeque<PendingTx> = VecDeque::new();
    let mut accepting = true;

    loop {
        if !accepting && pending.is_empty() {
            break;
        }
        tokio::select! {
            biased;

            cmd = cmd_rx.recv(), if accepting => {
                let Some(cmd) = cmd else {
                    accepting = false;
                    continue;
                };
                pending.push_back(cmd.response_tx);
                if !channel.send(cmd.payload) {
                    warn!(kind = cmd.kind, "channel closed while sending request");
                    break;
                }
                debug!(kind = cmd.kind, pending = pending.len(), "request sent");
            }
            msg = channel.recv() => {
                let Some(text) = msg else {
                    debug!("channel closed by peer");
                    break;
                };
                route_inbound(&text, &mut pending, &subscribers);
            }
        }
    }

    if !pending.is_empty() {
        debug!(outstanding = pending.len(), "rejecting calls still pending at close");
    }
    for tx in pending.drain(..) {
        let _ = tx.send(Err(ClientError::ConnectionClosed));
    }
}

/// Route one inbound payload to the oldest pending call or to subscribers.
fn route_inbound(text: &str, pending: &mut VecDeque<PendingTx>, subscribers: &Subscribers) {
    match Inbound::decode(text) {
        Ok(Inbound::Response(response)) => match pending.pop_front() {
            Some(tx) => {
                trace!(kind = response.kind(), "response correlated");
                // The caller may have dropped its future; the slot is consumed either way.
                let _ = tx.send(Ok(response));
            }
            None => debug!(kind = response.kind(), "dropping response with no pending call"),
        },
        Ok(Inbound::Notification(notification)) => {
            let delivered = subscribers.dispatch(&notification);
            trace!(kind = notification.kind(), delivered, "notification dispatched");
        }
        Ok(Inbound::Unrouted(_)) => {
            debug!("dropping payload without response or event field");
        }
        Err(e) => {
            warn!(error = %e, "dropping undecodable payload");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
