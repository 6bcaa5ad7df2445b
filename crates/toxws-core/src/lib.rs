//! # toxws-core
//!
//! Foundation types shared by every toxws crate:
//!
//! - [`protocol`]: the JSON wire shapes exchanged with the `ws-tox` daemon
//!   ([`Request`], [`Response`], [`Notification`]) and the [`Inbound`]
//!   decoder that routes a raw payload to one of them
//! - [`errors`]: [`ClientError`] and [`DecodeError`]
//! - [`logging`]: `tracing` subscriber setup

#![deny(unsafe_code)]

pub mod errors;
pub mod logging;
pub mod protocol;

pub use errors::{ClientError, DecodeError, Result};
pub use protocol::{FriendNumber, Inbound, MessageKind, Notification, Request, Response};
