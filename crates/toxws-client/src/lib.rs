//! # toxws-client
//!
//! Connection layer for the `ws-tox` daemon.
//!
//! - [`DuplexChannel`]: message-oriented text channel the client runs on
//! - [`CorrelationClient`]: typed requests with FIFO response correlation,
//!   plus a notification feed
//! - [`websocket`]: bridge from a `tokio-tungstenite` socket to a channel

#![deny(unsafe_code)]

pub mod channel;
pub mod correlation;
pub mod subscribers;
pub mod websocket;

pub use channel::DuplexChannel;
pub use correlation::{CorrelationClient, PendingResponse};
pub use subscribers::{NotificationHandler, SubscriptionId, Subscribers};
