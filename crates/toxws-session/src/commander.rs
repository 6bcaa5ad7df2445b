//! Command parser: one line of text to one [`Action`].
//!
//! Parsing is pure and total. Every line maps to exactly one action or to
//! `None`, nothing is remembered between calls, and whether the daemon will
//! accept the arguments is not checked here.

use toxws_core::FriendNumber;
use tracing::trace;

use crate::input::{DELIMITER, Input};

/// A parsed user command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Show usage.
    Help,
    /// Show info; `None` means our own.
    Info {
        /// Friend to describe.
        friend: Option<FriendNumber>,
    },
    /// Add a friend, with a friend request if a message is given.
    Add {
        /// Peer's Tox ID, passed through unvalidated.
        tox_id: String,
        /// Friend request text.
        message: Option<String>,
    },
    /// Route free text to a friend from now on.
    Chat {
        /// Conversation target.
        friend: FriendNumber,
    },
}

/// Parses command lines (without the command prefix).
#[derive(Clone, Copy, Debug, Default)]
pub struct Commander;

impl Commander {
    /// Create a commander.
    pub fn new() -> Self {
        Self
    }

    /// Parse a command line. `None` means the line is not a valid command.
    ///
    /// Command names are matched exactly and case-sensitively. Tokens after
    /// the ones a command uses are ignored, except for `help`, which takes
    /// none.
    pub fn evaluate(&self, line: &str) -> Option<Action> {
        let (command, rest) = line.split_once(DELIMITER).unwrap_or((line, ""));
        let mut input = Input::new(rest);

        let action = match command {
            "help" => input.is_over().then_some(Action::Help),
            "info" => match input.read_word() {
                Some(word) => word
                    .parse()
                    .ok()
                    .map(|friend| Action::Info { friend: Some(friend) }),
                None => Some(Action::Info { friend: None }),
            },
            "add" => input.read_word().map(|tox_id| Action::Add {
                tox_id: tox_id.to_string(),
                message: input.read_line().map(str::to_string),
            }),
            "chat" => input
                .read_word()
                .and_then(|word| word.parse().ok())
                .map(|friend| Action::Chat { friend }),
            _ => None,
        };
        trace!(command, valid = action.is_some(), "evaluated command");
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(line: &str) -> Option<Action> {
        Commander::new().evaluate(line)
    }

    fn friend(n: u32) -> FriendNumber {
        FriendNumber::new(n)
    }

    // ── help ────────────────────────────────────────────────────────

    #[test]
    fn help() {
        assert_eq!(eval("help"), Some(Action::Help));
    }

    #[test]
    fn help_with_trailing_spaces() {
        assert_eq!(eval("help   "), Some(Action::Help));
    }

    #[test]
    fn help_with_argument_is_invalid() {
        assert_eq!(eval("help extra"), None);
    }

    // ── info ────────────────────────────────────────────────────────

    #[test]
    fn info_with_friend() {
        assert_eq!(eval("info 5"), Some(Action::Info { friend: Some(friend(5)) }));
    }

    #[test]
    fn info_without_friend_means_self() {
        assert_eq!(eval("info"), Some(Action::Info { friend: None }));
        assert_eq!(eval("info   "), Some(Action::Info { friend: None }));
    }

    #[test]
    fn info_with_non_numeric_friend_is_invalid() {
        assert_eq!(eval("info abc"), None);
        assert_eq!(eval("info -1"), None);
        assert_eq!(eval("info 7x"), None);
    }

    // ── add ─────────────────────────────────────────────────────────

    #[test]
    fn add_with_message() {
        assert_eq!(
            eval("add peer123 hello world"),
            Some(Action::Add {
                tox_id: "peer123".into(),
                message: Some("hello world".into()),
            })
        );
    }

    #[test]
    fn add_without_message() {
        assert_eq!(
            eval("add peer123"),
            Some(Action::Add {
                tox_id: "peer123".into(),
                message: None,
            })
        );
    }

    #[test]
    fn add_with_blank_message_means_no_message() {
        assert_eq!(
            eval("add peer123     "),
            Some(Action::Add {
                tox_id: "peer123".into(),
                message: None,
            })
        );
    }

    #[test]
    fn add_keeps_message_spacing() {
        assert_eq!(
            eval("add peer123  two  spaces "),
            Some(Action::Add {
                tox_id: "peer123".into(),
                message: Some(" two  spaces ".into()),
            })
        );
    }

    #[test]
    fn add_skips_spaces_before_id() {
        assert_eq!(
            eval("add    peer123 hi"),
            Some(Action::Add {
                tox_id: "peer123".into(),
                message: Some("hi".into()),
            })
        );
    }

    #[test]
    fn add_without_id_is_invalid() {
        assert_eq!(eval("add"), None);
        assert_eq!(eval("add   "), None);
    }

    // ── chat ────────────────────────────────────────────────────────

    #[test]
    fn chat_with_friend() {
        assert_eq!(eval("chat 7"), Some(Action::Chat { friend: friend(7) }));
    }

    #[test]
    fn chat_without_friend_is_invalid() {
        assert_eq!(eval("chat"), None);
        assert_eq!(eval("chat  "), None);
    }

    #[test]
    fn chat_with_non_numeric_friend_is_invalid() {
        assert_eq!(eval("chat bob"), None);
    }

    #[test]
    fn chat_ignores_trailing_tokens() {
        assert_eq!(eval("chat 7 later"), Some(Action::Chat { friend: friend(7) }));
    }

    // ── dispatch ────────────────────────────────────────────────────

    #[test]
    fn unknown_command_is_invalid() {
        assert_eq!(eval("bogus"), None);
        assert_eq!(eval(""), None);
    }

    #[test]
    fn commands_are_case_sensitive() {
        assert_eq!(eval("HELP"), None);
        assert_eq!(eval("Chat 1"), None);
    }

    #[test]
    fn leading_space_makes_empty_command() {
        assert_eq!(eval(" help"), None);
    }

    #[test]
    fn evaluation_keeps_no_state() {
        let commander = Commander::new();
        assert_eq!(commander.evaluate("chat 1"), Some(Action::Chat { friend: friend(1) }));
        assert_eq!(commander.evaluate("chat"), None);
        assert_eq!(commander.evaluate("chat 2"), Some(Action::Chat { friend: friend(2) }));
    }
}
