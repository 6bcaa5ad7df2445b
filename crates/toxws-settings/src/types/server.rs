//! Daemon connection settings.

use serde::{Deserialize, Serialize};

/// Where and how to reach the `ws-tox` daemon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// WebSocket URL of the daemon.
    pub url: String,
    /// Give up connecting after this many milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:2794".to_string(),
            connect_timeout_ms: 5_000,
        }
    }
}
