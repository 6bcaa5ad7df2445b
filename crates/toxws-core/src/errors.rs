//! Client error types.

use thiserror::Error;

/// Errors surfaced to callers of the correlation client.
///
/// Daemon-level failures are not represented here: a response whose payload
/// signals an error still fulfils its call as an ordinary [`Response`].
///
/// [`Response`]: crate::protocol::Response
#[derive(Debug, Error)]
pub enum ClientError {
    /// The channel closed before a response arrived for this call.
    #[error("connection closed before a response arrived")]
    ConnectionClosed,
    /// The request could not be serialized.
    #[error("failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reasons an inbound payload could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload is not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    /// Payload is JSON but not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
