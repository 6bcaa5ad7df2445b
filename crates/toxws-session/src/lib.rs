//! # toxws-session
//!
//! The interactive layer of the toxws client:
//!
//! - [`Input`]: word/line cursor over one line of text
//! - [`Commander`]: parses `help`, `info`, `add` and `chat` into [`Action`]s
//! - [`SessionController`]: active-friend state, dispatch to the
//!   [`CorrelationClient`](toxws_client::CorrelationClient), and transcript
//!   output through a [`DisplaySink`]

#![deny(unsafe_code)]

pub mod commander;
pub mod controller;
pub mod display;
pub mod input;

pub use commander::{Action, Commander};
pub use controller::{SessionController, SessionOptions, help_lines};
pub use display::DisplaySink;
pub use input::Input;
