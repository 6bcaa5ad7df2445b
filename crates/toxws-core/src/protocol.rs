//! JSON wire protocol spoken with the `ws-tox` daemon.
//!
//! Three shapes share one channel:
//!
//! - Requests go out as `{"request": "<Kind>", ...fields}`.
//! - Responses come back as `{"response": <marker>, ...payload}`, one per
//!   request, in send order. There is no request id on the wire.
//! - Notifications arrive unsolicited as `{"event": "<Kind>", ...payload}`.
//!
//! Responses and notifications are told apart only by which discriminant
//! field is present; see [`Inbound::decode`].

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::DecodeError;

/// Discriminant field carried by every response.
pub const RESPONSE_FIELD: &str = "response";

/// Discriminant field carried by every notification.
pub const EVENT_FIELD: &str = "event";

// ─────────────────────────────────────────────────────────────────────────────
// FriendNumber
// ─────────────────────────────────────────────────────────────────────────────

/// Daemon-assigned number identifying a friend in the local friend list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FriendNumber(u32);

impl FriendNumber {
    /// Wrap a raw friend number.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// The raw friend number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for FriendNumber {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

impl FromStr for FriendNumber {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for FriendNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outbound
// ─────────────────────────────────────────────────────────────────────────────

/// Kind of a friend message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// Plain chat text.
    #[default]
    Normal,
    /// An action, shown as `/me`-style text by most clients.
    Action,
}

/// A request sent to the daemon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request")]
pub enum Request {
    /// Own name and Tox ID.
    Info,
    /// Send a friend request carrying a message.
    AddFriend {
        /// Tox ID of the peer.
        tox_id: String,
        /// Friend request text.
        message: String,
    },
    /// Add a friend without sending a friend request.
    AddFriendNorequest {
        /// Tox ID of the peer.
        tox_id: String,
    },
    /// Send a message to a friend.
    SendFriendMessage {
        /// Target friend.
        friend: FriendNumber,
        /// Message kind.
        kind: MessageKind,
        /// Message body.
        message: String,
    },
}

impl Request {
    /// Wire name of the request kind, as carried in the `request` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::AddFriend { .. } => "AddFriend",
            Self::AddFriendNorequest { .. } => "AddFriendNorequest",
            Self::SendFriendMessage { .. } => "SendFriendMessage",
        }
    }

    /// Serialize to the JSON text written on the channel.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inbound
// ─────────────────────────────────────────────────────────────────────────────

/// A daemon reply to exactly one earlier [`Request`].
///
/// The payload is opaque: whether it signals success or failure is for the
/// display layer to decide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Value of the `response` discriminant.
    pub response: Value,
    /// Every other field of the payload.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Response {
    /// The discriminant as a string, when the daemon sent one.
    pub fn kind(&self) -> Option<&str> {
        self.response.as_str()
    }

    /// A payload field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// Serialized JSON form, as shown to the user.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A daemon-originated event not solicited by any pending request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Value of the `event` discriminant.
    pub event: Value,
    /// Every other field of the payload.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Notification {
    /// Event kind name, e.g. `"FriendMessage"`.
    pub fn kind(&self) -> Option<&str> {
        self.event.as_str()
    }

    /// A payload field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// Serialized JSON form, as shown to the user.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A decoded inbound payload, routed by its discriminant field.
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    /// Carries a `response` field.
    Response(Response),
    /// Carries an `event` field and no `response` field.
    Notification(Notification),
    /// A JSON object with neither discriminant.
    Unrouted(Map<String, Value>),
}

impl Inbound {
    /// Decode a raw text payload.
    ///
    /// No schema validation is performed beyond locating the discriminant.
    /// `response` is checked before `event`, so a payload carrying both is a
    /// response.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let Value::Object(mut map) = serde_json::from_str::<Value>(text)? else {
            return Err(DecodeError::NotAnObject);
        };

        if let Some(response) = map.remove(RESPONSE_FIELD) {
            return Ok(Self::Response(Response {
                response,
                payload: map,
            }));
        }
        if let Some(event) = map.remove(EVENT_FIELD) {
            return Ok(Self::Notification(Notification {
                event,
                payload: map,
            }));
        }
        Ok(Self::Unrouted(map))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
