//! Interactive session settings.

use serde::{Deserialize, Serialize};

/// How user input is interpreted and echoed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Character that marks a line as a command.
    pub command_prefix: char,
    /// Echo outgoing chat lines as `> text` before sending.
    pub echo_outgoing: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            command_prefix: '/',
            echo_outgoing: true,
        }
    }
}
